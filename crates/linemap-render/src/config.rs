#![forbid(unsafe_code)]

//! Line-map configuration.

/// Configuration for a [`LineMapContext`](crate::context::LineMapContext).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMapConfig {
    /// Run the matcher at all. When off, every computation yields an
    /// all-`None` map and the caller falls back to per-line diffing.
    pub enabled: bool,
    /// Tallest screen the context will size itself for. Taller screens
    /// fail with `ResourceExhausted`.
    pub max_lines: usize,
    /// Lines of scratch storage reserved when the context is created.
    pub initial_lines: usize,
}

impl Default for LineMapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_lines: u16::MAX as usize,
            initial_lines: 0,
        }
    }
}

impl LineMapConfig {
    /// Default config with a custom line budget.
    pub fn with_max_lines(max_lines: usize) -> Self {
        Self {
            max_lines,
            ..Default::default()
        }
    }

    /// Default config that reserves storage for `lines` up front.
    pub fn with_initial_lines(lines: usize) -> Self {
        Self {
            initial_lines: lines,
            ..Default::default()
        }
    }

    /// A config that never matches lines.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}
