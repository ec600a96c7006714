//! Character-class arithmetic.
//!
//! `+` is union, `-` is difference, `!` is negation. An expression is kept
//! unevaluated inside the tree and normalized into a [`ClassSet`] when the
//! enclosing `char_set` node is rendered.
//!
//! Normalization only swaps positives and negatives on `!`, so it is not a
//! full complement: `!(A - B)` renders as `[B&&[^A]]` instead of `[^A]|[B]`,
//! which matches only what is in `B` and outside `A`. For `B` a subset of
//! `A` that is the empty class.

use std::ops::{Add, Not, Sub};

use crate::expr::{Expr, ExprKind};

#[derive(Debug, Clone)]
pub enum CharSetExpr {
    /// A class leaf: a char literal, a range or a nested set.
    Leaf(Expr),
    Invert(Box<CharSetExpr>),
    Union(Vec<CharSetExpr>),
    Difference(Box<CharSetExpr>, Box<CharSetExpr>),
}

/// Normalized class: matches any positive element and no negative element.
#[derive(Debug, Clone, Default)]
pub struct ClassSet {
    positives: Vec<Expr>,
    negatives: Vec<Expr>,
}

impl ClassSet {
    pub fn positives(&self) -> &[Expr] {
        &self.positives
    }

    pub fn negatives(&self) -> &[Expr] {
        &self.negatives
    }

    fn union(mut self, other: ClassSet) -> ClassSet {
        self.positives.extend(other.positives);
        self.negatives.extend(other.negatives);
        self
    }

    fn invert(self) -> ClassSet {
        ClassSet {
            positives: self.negatives,
            negatives: self.positives,
        }
    }
}

enum Step<'a> {
    Visit(&'a CharSetExpr),
    Invert,
    Union(usize),
    Difference,
}

impl CharSetExpr {
    /// Normalizes the expression.
    ///
    /// Returns `None` when no leaf resolves to a class element.
    pub fn eval(&self) -> Option<ClassSet> {
        let mut work = vec![Step::Visit(self)];
        let mut values: Vec<Option<ClassSet>> = Vec::new();

        while let Some(step) = work.pop() {
            match step {
                Step::Visit(CharSetExpr::Leaf(expr)) => match expr.kind() {
                    ExprKind::CharLiteral(_) | ExprKind::CharRange(_) => {
                        values.push(Some(ClassSet {
                            positives: vec![expr.clone()],
                            negatives: Vec::new(),
                        }));
                    }
                    ExprKind::CharSet(nested) => work.push(Step::Visit(nested)),
                    _ => values.push(None),
                },
                Step::Visit(CharSetExpr::Invert(inner)) => {
                    work.push(Step::Invert);
                    work.push(Step::Visit(inner));
                }
                Step::Visit(CharSetExpr::Union(items)) => {
                    work.push(Step::Union(items.len()));
                    work.extend(items.iter().rev().map(Step::Visit));
                }
                Step::Visit(CharSetExpr::Difference(lhs, rhs)) => {
                    work.push(Step::Difference);
                    work.push(Step::Visit(rhs));
                    work.push(Step::Visit(lhs));
                }
                Step::Invert => {
                    let value = values.pop()?;
                    values.push(value.map(ClassSet::invert));
                }
                Step::Union(count) => {
                    let items = values.split_off(values.len().checked_sub(count)?);
                    values.push(items.into_iter().flatten().reduce(ClassSet::union));
                }
                Step::Difference => {
                    let rhs = values.pop()?;
                    let lhs = values.pop()?;
                    values.push(match (lhs, rhs) {
                        (Some(lhs), Some(rhs)) => Some(lhs.union(rhs.invert())),
                        (lhs, _) => lhs,
                    });
                }
            }
        }

        values.pop().flatten()
    }
}

impl From<Expr> for CharSetExpr {
    fn from(expr: Expr) -> Self {
        match expr.kind() {
            ExprKind::CharSet(inner) => inner.clone(),
            _ => CharSetExpr::Leaf(expr),
        }
    }
}

impl From<&Expr> for CharSetExpr {
    fn from(expr: &Expr) -> Self {
        CharSetExpr::from(expr.clone())
    }
}

impl From<char> for CharSetExpr {
    fn from(c: char) -> Self {
        CharSetExpr::Leaf(Expr::from(c))
    }
}

impl<R: Into<CharSetExpr>> Add<R> for CharSetExpr {
    type Output = CharSetExpr;

    fn add(self, rhs: R) -> CharSetExpr {
        let mut items = match self {
            CharSetExpr::Union(items) => items,
            other => vec![other],
        };
        match rhs.into() {
            CharSetExpr::Union(more) => items.extend(more),
            other => items.push(other),
        }
        CharSetExpr::Union(items)
    }
}

impl<R: Into<CharSetExpr>> Sub<R> for CharSetExpr {
    type Output = CharSetExpr;

    fn sub(self, rhs: R) -> CharSetExpr {
        CharSetExpr::Difference(Box::new(self), Box::new(rhs.into()))
    }
}

impl Not for CharSetExpr {
    type Output = CharSetExpr;

    fn not(self) -> CharSetExpr {
        match self {
            CharSetExpr::Invert(inner) => *inner,
            other => CharSetExpr::Invert(Box::new(other)),
        }
    }
}
