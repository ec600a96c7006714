#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data model for regexpr.
//!
//! Three layers:
//! - **Pattern algebra** (`Expr`, `CharSetExpr`): immutable expression trees
//!   built from literals, sequences, choices, repeats, assertions and
//!   character-class arithmetic
//! - **Tokens and rules** (`Token`, `Rule`, `Action`): named captures carrying
//!   typed production rules
//! - **Capture model** (`ParseTree`, `Capture`, `OperatorCapture`): the
//!   per-parse tree of capture occurrences seen by selectors and preconditions
//!
//! Rendering lives in `regexpr-compiler`, matching and folding in `regexpr-vm`.

pub mod action;
pub mod capture;
pub mod charset;
mod colors;
mod error;
pub mod expr;
pub mod rule;
pub mod token;

#[cfg(test)]
mod capture_tests;
#[cfg(test)]
mod expr_tests;
#[cfg(test)]
mod token_tests;

pub use action::Action;
pub use capture::{
    Capture, NodeId, Operand, OperandCapture, OperatorCapture, ParseTree, Siblings,
};
pub use charset::{CharSetExpr, ClassSet};
pub use colors::Colors;
pub use error::RuleError;
pub use expr::{
    Assertion, CharLiteral, CharRange, Direction, Expr, ExprKind, Literal, Repeat, char_literal,
    char_range, char_raw, char_set, choice, literal, look_ahead, look_behind, raw, sequence,
};
pub use rule::{ProductionRule, Rule, RuleInput, RuleKind, Value};
pub use token::{Token, WsPolicy};
