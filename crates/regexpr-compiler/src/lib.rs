//! regexpr compiler: lowers expression trees to native regex syntax.
//!
//! The single entry point is [`render`] (or [`RenderOptions::render`]). It
//! walks the tree once and returns a [`Pattern`]:
//! - the pattern string
//! - the capture table mapping generated group names to their tokens
//! - the token parent/child relation
//! - the repeat-iteration table used to enumerate repeated captures

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod render;

pub use render::{
    CaptureSlot, Pattern, PatternDump, ROOT_KEY, RenderError, RenderOptions, RepeatGroup, Scope,
    render,
};
