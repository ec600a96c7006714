//! regexpr: composable regex patterns with typed production rules.
//!
//! Expressions are built from the algebra in [`regexpr_core`], rendered once
//! into a native pattern and run by a [`Parser`]. Named tokens carry rules
//! that fold every captured occurrence, repeated ones included, into typed
//! values.
//!
//! # Example
//!
//! ```
//! use regexpr_lib::action::capture;
//! use regexpr_lib::consts::{char_digit, char_space};
//! use regexpr_lib::{Expr, Rule, Token, compile};
//!
//! let num = Token::new("NUM", char_digit().one_or_more())
//!     .rule(Rule::<u32>::new().action(capture(|text| text.parse().unwrap_or_default())));
//! let parser = compile(&Expr::from(num).one_or_more(), Some(&char_space().repeat())).unwrap();
//!
//! let productions = parser.parse("4 8 15").unwrap();
//! let total: u32 = productions.values::<u32>("NUM").sum();
//! assert_eq!(total, 27);
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod consts;
pub mod diagnostics;
pub mod grammars;


pub use diagnostics::ErrorPrinter;
pub use regexpr_compiler::{Pattern, RenderError, RenderOptions, render};
pub use regexpr_core::{
    Capture, CharSetExpr, Colors, Expr, OperandCapture, OperatorCapture, ParseTree, Rule,
    RuleKind, Token, Value, WsPolicy, action, char_literal, char_range, char_raw, char_set,
    choice, literal, look_ahead, look_behind, raw, sequence,
};
pub use regexpr_vm::{
    CompileError, NoopTracer, ParseError, Parser, ParserBuilder, PrintTracer, Production,
    Productions, Tracer, Verbosity,
};

/// Errors from any stage between an expression and its productions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    /// Span of the offending occurrence, for errors raised while folding.
    pub fn span(&self) -> Option<std::ops::Range<usize>> {
        match self {
            Error::Parse(err) => err.span(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Renders `expr` and compiles the pattern into a parser.
pub fn compile(expr: &Expr, default_ws: Option<&Expr>) -> Result<Parser> {
    let pattern = render(expr, default_ws)?;
    Ok(Parser::new(pattern)?)
}
