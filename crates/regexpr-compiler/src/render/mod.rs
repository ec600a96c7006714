//! Rendering of expression trees.
//!
//! - `capture_id`: generated group names
//! - `pattern`: the render artifact and its serializable dump
//! - `renderer`: the iterative tree walk

mod capture_id;
mod error;
mod pattern;
mod renderer;

#[cfg(test)]
mod pattern_tests;
#[cfg(test)]
mod renderer_tests;

pub use error::RenderError;
pub use pattern::{CaptureSlot, Pattern, PatternDump, ROOT_KEY, RepeatGroup, Scope};
pub use renderer::{RenderOptions, render};
