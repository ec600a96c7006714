//! Rule actions.
//!
//! Each constructor builds an [`Action<T>`] that computes or adjusts the
//! production of a rule. Operand types are checked at run time: an action
//! whose operands do not downcast to the declared types is skipped, as is an
//! action whose predicate returns false.
//!
//! ```
//! use regexpr_core::Rule;
//! use regexpr_core::action::{capture, create2};
//!
//! let number: Rule<i64> = Rule::new().action(capture(|text| text.parse().unwrap_or_default()));
//! let sum: Rule<i64> = Rule::infix::<i64, i64>(10).action(create2(|l: &i64, r: &i64| l + r));
//! # let _ = (number, sum);
//! ```

use std::any::Any;

use crate::error::RuleError;
use crate::rule::Value;

type Run<T> = Box<dyn Fn(&mut Option<T>, &str, &[Value]) -> Result<bool, RuleError> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Effect {
    Capture,
    Create,
    Transform,
    Update,
    Error,
}

pub struct Action<T> {
    effect: Effect,
    source: Option<String>,
    run: Run<T>,
}

impl<T> Action<T> {
    /// Binds the action to every child production of token `token_id`
    /// instead of the rule operands.
    pub fn from(mut self, token_id: impl Into<String>) -> Self {
        self.source = Some(token_id.into());
        self
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub(crate) fn needs_production(&self) -> bool {
        matches!(
            self.effect,
            Effect::Transform | Effect::Update | Effect::Error
        )
    }

    /// Returns whether the action took effect.
    pub(crate) fn run(
        &self,
        production: &mut Option<T>,
        text: &str,
        operands: &[Value],
    ) -> Result<bool, RuleError> {
        (self.run)(production, text, operands)
    }
}

impl<T> std::fmt::Debug for Action<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action")
            .field("effect", &self.effect)
            .field("source", &self.source)
            .finish()
    }
}

fn operand<A: Any>(operands: &[Value], index: usize) -> Option<&A> {
    operands.get(index)?.downcast_ref::<A>()
}

fn unary<T, A, F>(effect: Effect, f: F) -> Action<T>
where
    T: 'static,
    A: Any,
    F: Fn(&mut Option<T>, &A) -> Result<bool, RuleError> + Send + Sync + 'static,
{
    Action {
        effect,
        source: None,
        run: Box::new(
            move |production: &mut Option<T>, _: &str, operands: &[Value]| {
                match operand::<A>(operands, 0) {
                    Some(a) => f(production, a),
                    None => Ok(false),
                }
            },
        ),
    }
}

fn binary<T, A, B, F>(effect: Effect, f: F) -> Action<T>
where
    T: 'static,
    A: Any,
    B: Any,
    F: Fn(&mut Option<T>, &A, &B) -> Result<bool, RuleError> + Send + Sync + 'static,
{
    Action {
        effect,
        source: None,
        run: Box::new(move |production: &mut Option<T>, _: &str, operands: &[Value]| {
            match (operand::<A>(operands, 0), operand::<B>(operands, 1)) {
                (Some(a), Some(b)) => f(production, a, b),
                _ => Ok(false),
            }
        }),
    }
}

// ============================================================================
// Capture
// ============================================================================

/// Produces a value from the matched text.
pub fn capture<T, F>(f: F) -> Action<T>
where
    T: 'static,
    F: Fn(&str) -> T + Send + Sync + 'static,
{
    capture_if(|_| true, f)
}

pub fn capture_if<T, P, F>(pred: P, f: F) -> Action<T>
where
    T: 'static,
    P: Fn(&str) -> bool + Send + Sync + 'static,
    F: Fn(&str) -> T + Send + Sync + 'static,
{
    Action {
        effect: Effect::Capture,
        source: None,
        run: Box::new(move |production: &mut Option<T>, text: &str, _: &[Value]| {
            if !pred(text) {
                return Ok(false);
            }
            *production = Some(f(text));
            Ok(true)
        }),
    }
}

// ============================================================================
// Create
// ============================================================================

pub fn create<T, A, F>(f: F) -> Action<T>
where
    T: 'static,
    A: Any,
    F: Fn(&A) -> T + Send + Sync + 'static,
{
    create_if(|_: &A| true, f)
}

pub fn create_if<T, A, P, F>(pred: P, f: F) -> Action<T>
where
    T: 'static,
    A: Any,
    P: Fn(&A) -> bool + Send + Sync + 'static,
    F: Fn(&A) -> T + Send + Sync + 'static,
{
    unary(Effect::Create, move |production, a: &A| {
        if !pred(a) {
            return Ok(false);
        }
        *production = Some(f(a));
        Ok(true)
    })
}

pub fn create2<T, A, B, F>(f: F) -> Action<T>
where
    T: 'static,
    A: Any,
    B: Any,
    F: Fn(&A, &B) -> T + Send + Sync + 'static,
{
    create2_if(|_: &A, _: &B| true, f)
}

pub fn create2_if<T, A, B, P, F>(pred: P, f: F) -> Action<T>
where
    T: 'static,
    A: Any,
    B: Any,
    P: Fn(&A, &B) -> bool + Send + Sync + 'static,
    F: Fn(&A, &B) -> T + Send + Sync + 'static,
{
    binary(Effect::Create, move |production, a: &A, b: &B| {
        if !pred(a, b) {
            return Ok(false);
        }
        *production = Some(f(a, b));
        Ok(true)
    })
}

// ============================================================================
// Transform
// ============================================================================

/// Replaces the current production.
pub fn transform<T, A, F>(f: F) -> Action<T>
where
    T: 'static,
    A: Any,
    F: Fn(T, &A) -> T + Send + Sync + 'static,
{
    transform_if(|_: &T, _: &A| true, f)
}

pub fn transform_if<T, A, P, F>(pred: P, f: F) -> Action<T>
where
    T: 'static,
    A: Any,
    P: Fn(&T, &A) -> bool + Send + Sync + 'static,
    F: Fn(T, &A) -> T + Send + Sync + 'static,
{
    unary(Effect::Transform, move |production, a: &A| {
        match production.take() {
            Some(current) if pred(&current, a) => *production = Some(f(current, a)),
            current => {
                *production = current;
                return Ok(false);
            }
        }
        Ok(true)
    })
}

pub fn transform2<T, A, B, F>(f: F) -> Action<T>
where
    T: 'static,
    A: Any,
    B: Any,
    F: Fn(T, &A, &B) -> T + Send + Sync + 'static,
{
    binary(Effect::Transform, move |production, a: &A, b: &B| {
        let Some(current) = production.take() else {
            return Ok(false);
        };
        *production = Some(f(current, a, b));
        Ok(true)
    })
}

// ============================================================================
// Update
// ============================================================================

/// Mutates the current production in place.
pub fn update<T, A, F>(f: F) -> Action<T>
where
    T: 'static,
    A: Any,
    F: Fn(&mut T, &A) + Send + Sync + 'static,
{
    update_if(|_: &T, _: &A| true, f)
}

pub fn update_if<T, A, P, F>(pred: P, f: F) -> Action<T>
where
    T: 'static,
    A: Any,
    P: Fn(&T, &A) -> bool + Send + Sync + 'static,
    F: Fn(&mut T, &A) + Send + Sync + 'static,
{
    unary(Effect::Update, move |production, a: &A| {
        let Some(current) = production.as_mut() else {
            return Ok(false);
        };
        if !pred(current, a) {
            return Ok(false);
        }
        f(current, a);
        Ok(true)
    })
}

pub fn update2<T, A, B, F>(f: F) -> Action<T>
where
    T: 'static,
    A: Any,
    B: Any,
    F: Fn(&mut T, &A, &B) + Send + Sync + 'static,
{
    binary(Effect::Update, move |production, a: &A, b: &B| match production.as_mut() {
        Some(current) => {
            f(current, a, b);
            Ok(true)
        }
        None => Ok(false),
    })
}

// ============================================================================
// Error
// ============================================================================

/// Fails the parse with `message` when `pred` holds.
pub fn error<T, A, P, M>(pred: P, message: M) -> Action<T>
where
    T: 'static,
    A: Any,
    P: Fn(&T, &A) -> bool + Send + Sync + 'static,
    M: Fn(&T, &A) -> String + Send + Sync + 'static,
{
    unary(Effect::Error, move |production, a: &A| match production.as_ref() {
        Some(current) if pred(current, a) => Err(RuleError::Message(message(current, a))),
        _ => Ok(false),
    })
}

pub fn error2<T, A, B, P, M>(pred: P, message: M) -> Action<T>
where
    T: 'static,
    A: Any,
    B: Any,
    P: Fn(&T, &A, &B) -> bool + Send + Sync + 'static,
    M: Fn(&T, &A, &B) -> String + Send + Sync + 'static,
{
    binary(Effect::Error, move |production, a: &A, b: &B| match production.as_ref() {
        Some(current) if pred(current, a, b) => {
            Err(RuleError::Message(message(current, a, b)))
        }
        _ => Ok(false),
    })
}
