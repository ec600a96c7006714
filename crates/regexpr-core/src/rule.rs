//! Production rules.
//!
//! A rule decides how one capture occurrence turns into a value. Its kind
//! decides how the occurrence takes part in operator folding; its actions
//! compute the value.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::action::Action;
use crate::capture::{Capture, OperatorCapture};
use crate::error::RuleError;

/// Type-erased production.
pub type Value = Arc<dyn Any + Send + Sync>;

type Selector = Box<dyn Fn(Capture<'_>) -> bool + Send + Sync>;
type PreCondition = Box<dyn Fn(OperatorCapture<'_>) -> bool + Send + Sync>;
type OperandCheck = fn(&Value) -> bool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Plain,
    Prefix,
    Postfix,
    Infix,
    LeftDelimiter,
    RightDelimiter,
}

impl RuleKind {
    pub fn needs_left_operand(self) -> bool {
        matches!(self, RuleKind::Postfix | RuleKind::Infix)
    }

    pub fn needs_right_operand(self) -> bool {
        matches!(self, RuleKind::Prefix | RuleKind::Infix)
    }

    pub fn is_operator(self) -> bool {
        matches!(self, RuleKind::Prefix | RuleKind::Postfix | RuleKind::Infix)
    }
}

/// What a rule gets to work with when it executes.
pub struct RuleInput<'a> {
    /// Text matched by the occurrence.
    pub text: &'a str,
    /// Popped operands, bottom of the stack first.
    pub operands: &'a [Value],
    /// Folded children of the occurrence, in document order.
    pub children: &'a [(&'a str, Value)],
}

/// Object-safe face of [`Rule`], stored on tokens.
pub trait ProductionRule: Send + Sync {
    fn kind(&self) -> RuleKind;
    fn priority(&self) -> i32;
    fn has_selector(&self) -> bool;
    fn select(&self, capture: Capture<'_>) -> bool;
    fn check_pre(&self, capture: OperatorCapture<'_>) -> bool;

    /// Number of operands popped before execution.
    fn operand_count(&self) -> usize;
    fn check_operand(&self, index: usize, value: &Value) -> bool;

    fn execute(&self, input: RuleInput<'_>) -> Result<Value, RuleError>;
}

fn is_value<T: Any>(value: &Value) -> bool {
    value.is::<T>()
}

/// Typed rule producing a `T`.
pub struct Rule<T> {
    kind: RuleKind,
    priority: i32,
    selector: Option<Selector>,
    pre: Option<PreCondition>,
    operands: Vec<OperandCheck>,
    actions: Vec<Action<T>>,
}

impl<T> Rule<T>
where
    T: Default + Send + Sync + 'static,
{
    fn with_kind(kind: RuleKind, priority: i32, operands: Vec<OperandCheck>) -> Self {
        Self {
            kind,
            priority,
            selector: None,
            pre: None,
            operands,
            actions: Vec::new(),
        }
    }

    pub fn new() -> Self {
        Self::with_kind(RuleKind::Plain, i32::MAX, Vec::new())
    }

    /// Operator taking a right operand of type `R`.
    pub fn prefix<R: Any>(priority: i32) -> Self {
        Self::with_kind(RuleKind::Prefix, priority, vec![is_value::<R>])
    }

    /// Operator taking a left operand of type `L`.
    pub fn postfix<L: Any>(priority: i32) -> Self {
        Self::with_kind(RuleKind::Postfix, priority, vec![is_value::<L>])
    }

    pub fn infix<L: Any, R: Any>(priority: i32) -> Self {
        Self::with_kind(
            RuleKind::Infix,
            priority,
            vec![is_value::<L>, is_value::<R>],
        )
    }

    pub fn left_delimiter() -> Self {
        Self::with_kind(RuleKind::LeftDelimiter, i32::MIN, Vec::new())
    }

    /// Closes a left delimiter producing `D` around an expression of type `E`.
    pub fn right_delimiter<D: Any, E: Any>() -> Self {
        Self::with_kind(
            RuleKind::RightDelimiter,
            i32::MAX,
            vec![is_value::<D>, is_value::<E>],
        )
    }

    pub fn select<F>(mut self, selector: F) -> Self
    where
        F: Fn(Capture<'_>) -> bool + Send + Sync + 'static,
    {
        self.selector = Some(Box::new(selector));
        self
    }

    pub fn pre<F>(mut self, pre: F) -> Self
    where
        F: Fn(OperatorCapture<'_>) -> bool + Send + Sync + 'static,
    {
        self.pre = Some(Box::new(pre));
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn action(mut self, action: Action<T>) -> Self {
        self.actions.push(action);
        self
    }

    /// Action order: consecutive child-bound actions form a block that runs
    /// once per matching child, in document order. Unbound actions run once.
    fn schedule<'v>(&self, children: &'v [(&'v str, Value)]) -> Vec<(usize, Option<&'v Value>)> {
        let mut steps = Vec::new();
        let mut i = 0;
        while i < self.actions.len() {
            if self.actions[i].source().is_none() {
                steps.push((i, None));
                i += 1;
                continue;
            }
            let start = i;
            while i < self.actions.len() && self.actions[i].source().is_some() {
                i += 1;
            }
            for (token_id, value) in children {
                for index in start..i {
                    if self.actions[index].source() == Some(*token_id) {
                        steps.push((index, Some(value)));
                    }
                }
            }
        }
        steps
    }
}

impl<T> Default for Rule<T>
where
    T: Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ProductionRule for Rule<T>
where
    T: Default + Send + Sync + 'static,
{
    fn kind(&self) -> RuleKind {
        self.kind
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn has_selector(&self) -> bool {
        self.selector.is_some()
    }

    fn select(&self, capture: Capture<'_>) -> bool {
        self.selector.as_ref().is_none_or(|f| f(capture))
    }

    fn check_pre(&self, capture: OperatorCapture<'_>) -> bool {
        self.pre.as_ref().is_none_or(|f| f(capture))
    }

    fn operand_count(&self) -> usize {
        self.operands.len()
    }

    fn check_operand(&self, index: usize, value: &Value) -> bool {
        self.operands.get(index).is_some_and(|check| check(value))
    }

    fn execute(&self, input: RuleInput<'_>) -> Result<Value, RuleError> {
        let mut production: Option<T> = None;
        for (index, child) in self.schedule(input.children) {
            let action = &self.actions[index];
            if production.is_none() && action.needs_production() {
                production = Some(T::default());
            }
            let operands = match child {
                Some(value) => std::slice::from_ref(value),
                None => input.operands,
            };
            action.run(&mut production, input.text, operands)?;
        }
        match production {
            Some(value) => Ok(Arc::new(value)),
            None if self.kind == RuleKind::RightDelimiter => Err(RuleError::NoProduction),
            None => Ok(Arc::new(T::default())),
        }
    }
}

impl<T> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .field("selector", &self.selector.is_some())
            .field("actions", &self.actions.len())
            .finish()
    }
}
