#![forbid(unsafe_code)]

//! Line-correspondence engine.
//!
//! Given the lines currently on a terminal ("old") and the lines that should
//! appear next ("new"), find for each new line an old line that plausibly
//! holds the same content. Runs of lines that moved together become scroll,
//! insert-line and delete-line operations for a downstream scroll optimizer
//! instead of full repaints.
//!
//! The matcher is a hashed variant of Heckel's algorithm: lines whose
//! fingerprint is unique on both screens anchor the map, anchors grow into
//! runs while neighbors match or are cheap to take along, and runs too short
//! for the distance they move are dropped.
//!
//! Entry point: [`LineMapContext::compute`](context::LineMapContext::compute).

pub mod anchor;
pub mod bucket;
pub mod config;
pub mod context;
pub mod cost;
pub mod error;
pub mod hash;
pub mod hunk;
pub mod map;
pub mod screen;

pub use config::LineMapConfig;
pub use context::{LineMapContext, LineMapStats};
pub use error::{Exhaustion, LineMapError, LineMapResult};
pub use map::{CorrespondenceMap, Hunk};
pub use screen::Screen;

pub use linemap_core::{Cell, LineCell};
