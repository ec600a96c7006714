//! Matching and folding.
//!
//! `matcher` turns a native match into a [`ParseTree`](regexpr_core::ParseTree),
//! `fold` runs the production rules over it, `productions` exposes the result.

mod error;
mod fold;
mod matcher;
mod parser;
mod productions;
mod trace;

#[cfg(test)]
mod fold_tests;
#[cfg(test)]
mod parser_tests;

pub use error::{CompileError, ParseError};
pub use parser::{DEFAULT_BACKTRACK_LIMIT, Parser, ParserBuilder};
pub use productions::{Production, Productions};
pub use trace::{NoopTracer, PrintTracer, Tracer, Verbosity};
