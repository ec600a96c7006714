#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Runtime for rendered regexpr patterns.
//!
//! A [`Parser`] compiles a [`Pattern`](regexpr_compiler::Pattern) once into
//! native regexes. Each `parse` call matches the input, rebuilds every
//! capture occurrence (repeated ones included) and folds them bottom-up
//! through the token rules into [`Productions`].

pub mod engine;

pub use engine::{
    CompileError, NoopTracer, ParseError, Parser, ParserBuilder, PrintTracer, Production,
    Productions, Tracer, Verbosity,
};
