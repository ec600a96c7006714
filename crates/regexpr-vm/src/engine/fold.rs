//! Bottom-up folding of capture occurrences.
//!
//! Occurrences are folded depth first, children before their parent. Every
//! occurrence owns a frame with an operand stack and an operator stack that
//! its children fold into. When the last child of an occurrence is placed,
//! the frame unwinds and its operands become the child productions of that
//! occurrence, in order.

use std::sync::Arc;

use regexpr_core::{
    Capture, NodeId, Operand, OperatorCapture, ParseTree, ProductionRule, RuleError, RuleInput,
    RuleKind, Token, Value,
};

use super::error::ParseError;
use super::productions::{Production, Productions};
use super::trace::Tracer;

const ROOT: NodeId = 0;

/// An occurrence waiting on the operator stack.
struct Pending<'p> {
    node: NodeId,
    rule: &'p dyn ProductionRule,
    children: Vec<(&'p str, Value)>,
    /// Operand stack height when the occurrence was pushed.
    base: usize,
}

struct Frame<'p> {
    operands: Vec<Operand>,
    operators: Vec<Pending<'p>>,
    productions: Vec<(&'p str, Value)>,
}

impl Frame<'_> {
    fn new() -> Self {
        Self {
            operands: Vec::new(),
            operators: Vec::new(),
            productions: Vec::new(),
        }
    }

    /// Operands below the innermost open left delimiter are out of reach.
    fn floor(&self) -> usize {
        self.operators
            .iter()
            .rev()
            .find(|p| p.rule.kind() == RuleKind::LeftDelimiter)
            .map_or(0, |p| p.base)
    }

    fn available(&self) -> usize {
        self.operands.len().saturating_sub(self.floor())
    }
}

struct Folder<'a, 'p, T: Tracer> {
    tree: &'a ParseTree<'a>,
    tokens: &'p [Arc<Token>],
    frames: Vec<Frame<'p>>,
    output: Vec<Production<'p>>,
    tracer: &'a mut T,
}

pub(super) fn fold<'a, 'p, T: Tracer>(
    tree: &'a ParseTree<'a>,
    tokens: &'p [Arc<Token>],
    tracer: &'a mut T,
) -> Result<Productions<'p>, ParseError> {
    let mut folder = Folder {
        tree,
        tokens,
        frames: (0..tree.len()).map(|_| Frame::new()).collect(),
        output: Vec::new(),
        tracer,
    };
    folder.run()?;
    Ok(Productions::new(folder.output))
}

fn rule_error(capture: Capture<'_>, err: RuleError) -> ParseError {
    ParseError::Rule {
        token: capture.token_id().to_owned(),
        span: capture.span(),
        message: err.to_string(),
    }
}

fn unbalanced(capture: Capture<'_>) -> ParseError {
    ParseError::Unbalanced {
        token: capture.token_id().to_owned(),
        span: capture.span(),
    }
}

impl<'a, 'p, T: Tracer> Folder<'a, 'p, T> {
    fn run(&mut self) -> Result<(), ParseError> {
        if self.tree.is_empty() {
            return Ok(());
        }

        // Post-order walk: (node, next child).
        let mut stack: Vec<(NodeId, usize)> = vec![(ROOT, 0)];
        while let Some(top) = stack.last_mut() {
            let (node, next) = *top;
            if let Some(&child) = self.tree.children(node).get(next) {
                top.1 += 1;
                stack.push((child, 0));
                continue;
            }
            stack.pop();
            if let Some(parent) = self.tree.capture(node).parent() {
                self.place(node, parent.id())?;
            }
        }
        Ok(())
    }

    fn token_id(&self, node: NodeId) -> &'p str {
        self.tokens
            .get(self.tree.token(node))
            .map_or("", |token| token.id())
    }

    fn select(&self, node: NodeId) -> Option<&'p dyn ProductionRule> {
        let tokens = self.tokens;
        let token = tokens.get(self.tree.token(node))?;
        token.select_rule(self.tree.capture(node))
    }

    /// Folds a finished occurrence into the frame of its parent.
    fn place(&mut self, node: NodeId, parent: NodeId) -> Result<(), ParseError> {
        let tree = self.tree;
        let capture = tree.capture(node);
        let children = std::mem::take(&mut self.frames[node].productions);
        let rule = self.select(node);
        self.tracer.trace_rule(capture, rule.map(|r| r.kind()));

        match rule {
            None => {
                let value: Value = Arc::new(capture.value().to_owned());
                self.frames[parent].operands.push(Operand { node, value });
            }
            Some(rule) => {
                let pending = Pending {
                    node,
                    rule,
                    children,
                    base: self.frames[parent].operands.len(),
                };
                match rule.kind() {
                    RuleKind::LeftDelimiter => self.push_operator(parent, pending),
                    RuleKind::RightDelimiter => self.close_delimiter(parent, pending)?,
                    kind if kind.is_operator() => {
                        self.unwind_from(parent, rule.priority())?;
                        if kind.needs_left_operand() && self.frames[parent].available() == 0 {
                            return Err(rule_error(capture, RuleError::MissingOperand));
                        }
                        if kind.needs_right_operand() {
                            self.push_operator(parent, pending);
                        } else {
                            self.apply(parent, pending)?;
                        }
                    }
                    _ => self.apply(parent, pending)?,
                }
            }
        }

        if capture.is_last() {
            self.close(parent)?;
        }
        Ok(())
    }

    fn push_operator(&mut self, parent: NodeId, pending: Pending<'p>) {
        self.tracer.trace_operator_push(self.tree.capture(pending.node));
        self.frames[parent].operators.push(pending);
    }

    /// Executes waiting operators whose priority is at least `priority`.
    fn unwind_from(&mut self, parent: NodeId, priority: i32) -> Result<(), ParseError> {
        while let Some(top) = self.frames[parent].operators.last() {
            if top.rule.kind() == RuleKind::LeftDelimiter || top.rule.priority() < priority {
                break;
            }
            let Some(pending) = self.frames[parent].operators.pop() else {
                break;
            };
            self.tracer.trace_unwind(self.tree.capture(pending.node));
            self.apply(parent, pending)?;
        }
        Ok(())
    }

    /// Unwinds to the matching left delimiter and folds
    /// `(left delimiter, expression)` through the right delimiter.
    fn close_delimiter(&mut self, parent: NodeId, right: Pending<'p>) -> Result<(), ParseError> {
        let tree = self.tree;
        loop {
            let Some(top) = self.frames[parent].operators.pop() else {
                return Err(unbalanced(tree.capture(right.node)));
            };
            self.tracer.trace_unwind(tree.capture(top.node));
            if top.rule.kind() != RuleKind::LeftDelimiter {
                self.apply(parent, top)?;
                continue;
            }

            if self.frames[parent].operands.len() <= top.base {
                return Err(unbalanced(tree.capture(right.node)));
            }
            let left = top.node;
            let value = self.execute(parent, &top)?;
            let operands = &mut self.frames[parent].operands;
            operands.push(Operand { node: left, value });
            let len = operands.len();
            operands.swap(len - 1, len - 2);
            return self.apply(parent, right);
        }
    }

    /// Unwinds everything and moves the operands to the parent productions.
    fn close(&mut self, parent: NodeId) -> Result<(), ParseError> {
        let tree = self.tree;
        while let Some(pending) = self.frames[parent].operators.pop() {
            let capture = tree.capture(pending.node);
            if pending.rule.kind() == RuleKind::LeftDelimiter {
                return Err(unbalanced(capture));
            }
            self.tracer.trace_unwind(capture);
            self.apply(parent, pending)?;
        }

        let top_level = parent == ROOT;
        let operands = std::mem::take(&mut self.frames[parent].operands);
        for Operand { node, value } in operands {
            let token = self.token_id(node);
            let capture = tree.capture(node);
            self.tracer.trace_production(capture, top_level);
            self.frames[parent].productions.push((token, value.clone()));
            self.output.push(Production {
                token,
                value,
                span: capture.span(),
                top_level,
            });
        }
        Ok(())
    }

    fn apply(&mut self, parent: NodeId, pending: Pending<'p>) -> Result<(), ParseError> {
        let value = self.execute(parent, &pending)?;
        self.frames[parent].operands.push(Operand {
            node: pending.node,
            value,
        });
        Ok(())
    }

    /// Checks the precondition, pops and type-checks operands, runs the rule.
    fn execute(&mut self, parent: NodeId, pending: &Pending<'p>) -> Result<Value, ParseError> {
        let tree = self.tree;
        let capture = tree.capture(pending.node);
        let rule = pending.rule;
        let frame = &mut self.frames[parent];
        let floor = frame.floor();

        let view = OperatorCapture::new(capture, &frame.operands[floor..]);
        if !rule.check_pre(view) {
            return Err(rule_error(capture, RuleError::PreCondition));
        }

        let count = rule.operand_count();
        if frame.available() < count {
            return Err(rule_error(capture, RuleError::MissingOperand));
        }
        let popped = frame.operands.split_off(frame.operands.len() - count);
        for (index, operand) in popped.iter().enumerate() {
            if !rule.check_operand(index, &operand.value) {
                return Err(rule_error(capture, RuleError::OperandType { index }));
            }
        }
        let operands: Vec<Value> = popped.into_iter().map(|o| o.value).collect();

        self.tracer.trace_execute(capture, rule.kind(), count);
        rule.execute(RuleInput {
            text: capture.value(),
            operands: &operands,
            children: &pending.children,
        })
        .map_err(|err| rule_error(capture, err))
    }
}
