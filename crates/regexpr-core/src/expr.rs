//! Pattern algebra.
//!
//! An [`Expr`] is an immutable, cheaply cloneable handle to a node tree.
//! Composition never mutates its inputs: `a & b` builds a new sequence,
//! `a | b` a new choice, and same-kind children are flattened on the way.

use std::fmt;
use std::ops::{Add, BitAnd, BitOr, Not, Sub};
use std::sync::Arc;

use crate::charset::CharSetExpr;
use crate::token::Token;

/// Shared handle to an expression node.
#[derive(Clone)]
pub struct Expr(Arc<ExprKind>);

/// The closed set of node kinds.
#[derive(Debug)]
pub enum ExprKind {
    Literal(Literal),
    CharLiteral(CharLiteral),
    CharRange(CharRange),
    CharSet(CharSetExpr),
    Sequence(Vec<Expr>),
    Choice(Vec<Expr>),
    Repeat(Repeat),
    Assertion(Assertion),
    Token(Arc<Token>),
}

/// Text matched verbatim, held in native syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pattern: String,
    atomic: bool,
}

impl Literal {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// True when a quantifier can follow the pattern without a group.
    pub fn is_atomic(&self) -> bool {
        self.atomic
    }
}

/// Class element listing individual characters, held in class syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharLiteral {
    chars: String,
}

impl CharLiteral {
    pub fn chars(&self) -> &str {
        &self.chars
    }
}

/// Inclusive character range. Both bounds are single-character literals.
#[derive(Debug, Clone)]
pub struct CharRange {
    lower: Expr,
    upper: Expr,
}

impl CharRange {
    pub fn lower(&self) -> &Expr {
        &self.lower
    }

    pub fn upper(&self) -> &Expr {
        &self.upper
    }
}

/// Quantified expression. `at_most == None` means unbounded.
#[derive(Debug, Clone)]
pub struct Repeat {
    child: Expr,
    at_least: usize,
    at_most: Option<usize>,
}

impl Repeat {
    pub fn child(&self) -> &Expr {
        &self.child
    }

    pub fn at_least(&self) -> usize {
        self.at_least
    }

    pub fn at_most(&self) -> Option<usize> {
        self.at_most
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ahead,
    Behind,
}

/// Zero-width lookaround.
#[derive(Debug, Clone)]
pub struct Assertion {
    child: Expr,
    direction: Direction,
    negated: bool,
}

impl Assertion {
    pub fn child(&self) -> &Expr {
        &self.child
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self(Arc::new(kind))
    }

    pub fn kind(&self) -> &ExprKind {
        &self.0
    }

    /// Identity comparison: true when both handles share the same node.
    pub fn ptr_eq(&self, other: &Expr) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn as_token(&self) -> Option<&Arc<Token>> {
        match self.kind() {
            ExprKind::Token(token) => Some(token),
            _ => None,
        }
    }

    /// True for nodes that may appear inside a character class.
    pub fn is_class(&self) -> bool {
        matches!(
            self.kind(),
            ExprKind::CharLiteral(_) | ExprKind::CharRange(_) | ExprKind::CharSet(_)
        )
    }

    /// Zero or more.
    pub fn repeat(self) -> Expr {
        self.repeat_range(0, None)
    }

    pub fn repeat_range(self, at_least: usize, at_most: Option<usize>) -> Expr {
        Expr::new(ExprKind::Repeat(Repeat {
            child: self,
            at_least,
            at_most,
        }))
    }

    pub fn repeat_n(self, count: usize) -> Expr {
        self.repeat_range(count, Some(count))
    }

    pub fn at_least(self, count: usize) -> Expr {
        self.repeat_range(count, None)
    }

    pub fn one_or_more(self) -> Expr {
        self.repeat_range(1, None)
    }

    pub fn optional(self) -> Expr {
        self.repeat_range(0, Some(1))
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// Constructors
// ============================================================================

/// Literal text. Every metacharacter is escaped.
pub fn literal(text: &str) -> Expr {
    Expr::new(ExprKind::Literal(Literal {
        pattern: regex_syntax::escape(text),
        atomic: text.chars().count() == 1,
    }))
}

/// Native pattern syntax, used as is.
pub fn raw(pattern: &str) -> Expr {
    Expr::new(ExprKind::Literal(Literal {
        pattern: pattern.to_owned(),
        atomic: is_atom(pattern),
    }))
}

fn is_atom(pattern: &str) -> bool {
    let mut chars = pattern.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(c), None, _) => !matches!(c, '|' | '(' | ')'),
        (Some('\\'), Some(_), None) => true,
        _ => false,
    }
}

/// Class element matching any of `chars`.
pub fn char_literal(chars: &str) -> Expr {
    let escaped: String = chars
        .chars()
        .map(|c| regex_syntax::escape(c.encode_utf8(&mut [0; 4])))
        .collect();
    char_raw(&escaped)
}

/// Class element in native class syntax, such as `\w` or `\r\n`.
pub fn char_raw(chars: &str) -> Expr {
    Expr::new(ExprKind::CharLiteral(CharLiteral {
        chars: chars.to_owned(),
    }))
}

pub fn char_range(lower: char, upper: char) -> Expr {
    Expr::new(ExprKind::CharRange(CharRange {
        lower: char_literal(lower.encode_utf8(&mut [0; 4])),
        upper: char_literal(upper.encode_utf8(&mut [0; 4])),
    }))
}

/// Character class built from class arithmetic. Evaluated when rendered.
pub fn char_set(expr: impl Into<CharSetExpr>) -> Expr {
    Expr::new(ExprKind::CharSet(expr.into()))
}

pub fn sequence<I>(items: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    let mut children = Vec::new();
    for item in items {
        let expr = item.into();
        match expr.kind() {
            ExprKind::Sequence(nested) => children.extend(nested.iter().cloned()),
            _ => children.push(expr),
        }
    }
    Expr::new(ExprKind::Sequence(children))
}

pub fn choice<I>(items: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    let mut children = Vec::new();
    for item in items {
        let expr = item.into();
        match expr.kind() {
            ExprKind::Choice(nested) => children.extend(nested.iter().cloned()),
            _ => children.push(expr),
        }
    }
    Expr::new(ExprKind::Choice(children))
}

/// Positive lookahead. An assertion argument keeps its negation.
pub fn look_ahead(expr: impl Into<Expr>) -> Expr {
    assert_with(expr.into(), Direction::Ahead)
}

/// Positive lookbehind. An assertion argument keeps its negation.
pub fn look_behind(expr: impl Into<Expr>) -> Expr {
    assert_with(expr.into(), Direction::Behind)
}

fn assert_with(expr: Expr, direction: Direction) -> Expr {
    let (child, negated) = match expr.kind() {
        ExprKind::Assertion(inner) => (inner.child.clone(), inner.negated),
        _ => (expr, false),
    };
    Expr::new(ExprKind::Assertion(Assertion {
        child,
        direction,
        negated,
    }))
}

// ============================================================================
// Operators
// ============================================================================

impl From<&str> for Expr {
    fn from(text: &str) -> Self {
        literal(text)
    }
}

impl From<String> for Expr {
    fn from(text: String) -> Self {
        literal(&text)
    }
}

impl From<char> for Expr {
    fn from(c: char) -> Self {
        char_literal(c.encode_utf8(&mut [0; 4]))
    }
}

impl From<&Expr> for Expr {
    fn from(expr: &Expr) -> Self {
        expr.clone()
    }
}

impl<R: Into<Expr>> BitAnd<R> for Expr {
    type Output = Expr;

    fn bitand(self, rhs: R) -> Expr {
        sequence([self, rhs.into()])
    }
}

impl BitAnd<Expr> for &str {
    type Output = Expr;

    fn bitand(self, rhs: Expr) -> Expr {
        sequence([literal(self), rhs])
    }
}

impl BitAnd<Expr> for char {
    type Output = Expr;

    fn bitand(self, rhs: Expr) -> Expr {
        sequence([Expr::from(self), rhs])
    }
}

impl<R: Into<Expr>> BitOr<R> for Expr {
    type Output = Expr;

    fn bitor(self, rhs: R) -> Expr {
        choice([self, rhs.into()])
    }
}

impl BitOr<Expr> for &str {
    type Output = Expr;

    fn bitor(self, rhs: Expr) -> Expr {
        choice([literal(self), rhs])
    }
}

impl BitOr<Expr> for char {
    type Output = Expr;

    fn bitor(self, rhs: Expr) -> Expr {
        choice([Expr::from(self), rhs])
    }
}

/// Negation.
///
/// Flips an assertion, inverts a character class, and turns any other
/// expression into a negative lookahead.
impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        if let ExprKind::Assertion(inner) = self.kind() {
            return Expr::new(ExprKind::Assertion(Assertion {
                child: inner.child.clone(),
                direction: inner.direction,
                negated: !inner.negated,
            }));
        }
        if self.is_class() {
            return char_set(!CharSetExpr::from(self));
        }
        Expr::new(ExprKind::Assertion(Assertion {
            child: self,
            direction: Direction::Ahead,
            negated: true,
        }))
    }
}

impl<R: Into<CharSetExpr>> Add<R> for Expr {
    type Output = CharSetExpr;

    fn add(self, rhs: R) -> CharSetExpr {
        CharSetExpr::from(self) + rhs
    }
}

impl<R: Into<CharSetExpr>> Sub<R> for Expr {
    type Output = CharSetExpr;

    fn sub(self, rhs: R) -> CharSetExpr {
        CharSetExpr::from(self) - rhs
    }
}
