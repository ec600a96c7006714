//! Errors raised while compiling or running a pattern.

use std::ops::Range;

/// The native engine rejected a rendered pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot compile pattern `{pattern}`: {message}")]
pub struct CompileError {
    pub pattern: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The pattern did not match, or matched only the empty string.
    #[error("input does not match")]
    NoMatch,

    /// A rule failed: error action, precondition, missing or mistyped operand.
    #[error("`{token}` at {span:?}: {message}")]
    Rule {
        token: String,
        span: Range<usize>,
        message: String,
    },

    /// A delimiter without its counterpart.
    #[error("unbalanced `{token}` at {span:?}")]
    Unbalanced { token: String, span: Range<usize> },

    /// The native engine gave up, e.g. on the backtrack limit.
    #[error("engine error: {0}")]
    Engine(String),
}

impl ParseError {
    /// Byte span of the offending occurrence, when there is one.
    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            ParseError::Rule { span, .. } | ParseError::Unbalanced { span, .. } => {
                Some(span.clone())
            }
            ParseError::NoMatch | ParseError::Engine(_) => None,
        }
    }

    pub fn is_no_match(&self) -> bool {
        matches!(self, ParseError::NoMatch)
    }
}

impl From<fancy_regex::Error> for ParseError {
    fn from(err: fancy_regex::Error) -> Self {
        ParseError::Engine(err.to_string())
    }
}
