#![forbid(unsafe_code)]

//! Errors for line-correspondence computations.
//!
//! | Error | Cause | Caller fallback |
//! |-------|-------|-----------------|
//! | `ResourceExhausted` (`LineBudget`) | screen taller than `max_lines` | full repaint |
//! | `ResourceExhausted` (`Allocation`) | scratch storage could not grow | full repaint |
//!
//! Hash collisions and other anomalies are not errors: they can only cost an
//! optimization, never correctness.

use std::collections::TryReserveError;
use std::fmt;

/// Why scratch storage could not be sized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exhaustion {
    /// The screen exceeds the configured line budget.
    LineBudget { limit: usize },
    /// The allocator refused to grow a scratch buffer.
    Allocation(TryReserveError),
}

/// Errors produced by [`LineMapContext`](crate::context::LineMapContext).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineMapError {
    /// Scratch storage could not be sized for `lines` lines. The map is
    /// left all-`None`.
    ResourceExhausted { lines: usize, cause: Exhaustion },
}

impl fmt::Display for LineMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceExhausted {
                lines,
                cause: Exhaustion::LineBudget { limit },
            } => write!(
                f,
                "cannot size line map for {lines} lines (limit is {limit})"
            ),
            Self::ResourceExhausted {
                lines,
                cause: Exhaustion::Allocation(e),
            } => write!(f, "cannot size line map for {lines} lines: {e}"),
        }
    }
}

impl std::error::Error for LineMapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ResourceExhausted {
                cause: Exhaustion::Allocation(e),
                ..
            } => Some(e),
            Self::ResourceExhausted { .. } => None,
        }
    }
}

impl LineMapError {
    pub(crate) fn allocation(lines: usize, e: TryReserveError) -> Self {
        Self::ResourceExhausted {
            lines,
            cause: Exhaustion::Allocation(e),
        }
    }

    pub(crate) fn over_budget(lines: usize, limit: usize) -> Self {
        Self::ResourceExhausted {
            lines,
            cause: Exhaustion::LineBudget { limit },
        }
    }

    /// Number of lines the failed computation needed.
    pub fn lines(&self) -> usize {
        match self {
            Self::ResourceExhausted { lines, .. } => *lines,
        }
    }
}

/// Result alias for line-map operations.
pub type LineMapResult<T> = Result<T, LineMapError>;
