#![forbid(unsafe_code)]

//! Core: the cell contract shared by the line-correspondence engine, plus
//! logging shims that compile away without the `tracing` feature.

pub mod cell;
pub mod logging;

pub use cell::{Cell, CellAttrs, CellContent, LineCell, PackedRgba, StyleFlags};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, trace_span, warn};
