//! Capture occurrences of a single parse.
//!
//! The parser builds a [`ParseTree`] after a successful match. Selectors see
//! an occurrence through [`Capture`], preconditions through
//! [`OperatorCapture`], which adds the operand stack of the enclosing
//! occurrence.

use std::ops::{Deref, Range};

use crate::rule::Value;

pub type NodeId = usize;

#[derive(Debug, Clone)]
struct Node<'a> {
    token: usize,
    token_id: &'a str,
    capture_id: &'a str,
    span: Range<usize>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    sibling_index: usize,
}

/// Arena of capture occurrences. Node `0` is the root.
#[derive(Debug, Clone)]
pub struct ParseTree<'a> {
    text: &'a str,
    nodes: Vec<Node<'a>>,
}

impl<'a> ParseTree<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            nodes: Vec::new(),
        }
    }

    /// Appends an occurrence as the last child of `parent`.
    ///
    /// `token` is an index into the caller's token table.
    pub fn push(
        &mut self,
        token: usize,
        token_id: &'a str,
        capture_id: &'a str,
        span: Range<usize>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = self.nodes.len();
        let sibling_index = match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(p) => {
                p.children.push(id);
                p.children.len() - 1
            }
            None => 0,
        };
        self.nodes.push(Node {
            token,
            token_id,
            capture_id,
            span,
            parent,
            children: Vec::new(),
            sibling_index,
        });
        id
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn token(&self, node: NodeId) -> usize {
        self.nodes[node].token
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node].children
    }

    pub fn capture(&self, node: NodeId) -> Capture<'_> {
        Capture { tree: self, node }
    }
}

/// Read-only view of one occurrence.
#[derive(Clone, Copy)]
pub struct Capture<'a> {
    tree: &'a ParseTree<'a>,
    node: NodeId,
}

impl<'a> Capture<'a> {
    fn data(self) -> &'a Node<'a> {
        &self.tree.nodes[self.node]
    }

    pub fn id(self) -> NodeId {
        self.node
    }

    pub fn token_id(self) -> &'a str {
        self.data().token_id
    }

    pub fn capture_id(self) -> &'a str {
        self.data().capture_id
    }

    /// Matched text.
    pub fn value(self) -> &'a str {
        &self.tree.text[self.data().span.clone()]
    }

    pub fn span(self) -> Range<usize> {
        self.data().span.clone()
    }

    pub fn parent(self) -> Option<Capture<'a>> {
        let tree = self.tree;
        self.data().parent.map(|node| Capture { tree, node })
    }

    pub fn children(self) -> impl Iterator<Item = Capture<'a>> {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&node| Capture { tree, node })
    }

    pub fn is_first(self) -> bool {
        self.data().sibling_index == 0
    }

    pub fn is_last(self) -> bool {
        self.sibling_index() + 1 >= self.siblings().len()
    }

    /// Following siblings whose token id is in `ids`, nearest first.
    /// An empty `ids` accepts every sibling.
    pub fn look_ahead<'i>(self, ids: &'i [&'i str]) -> Siblings<'a, 'i> {
        let after = self.siblings().get(self.sibling_index() + 1..);
        Siblings {
            tree: self.tree,
            ids,
            nodes: after.unwrap_or_default().iter(),
            reverse: false,
        }
    }

    /// Preceding siblings whose token id is in `ids`, nearest first.
    pub fn look_behind<'i>(self, ids: &'i [&'i str]) -> Siblings<'a, 'i> {
        let before = self.siblings().get(..self.sibling_index());
        Siblings {
            tree: self.tree,
            ids,
            nodes: before.unwrap_or_default().iter(),
            reverse: true,
        }
    }

    pub fn is(self, ids: &[&str]) -> bool {
        ids.contains(&self.token_id())
    }

    pub fn is_not(self, ids: &[&str]) -> bool {
        !self.is(ids)
    }

    fn sibling_index(self) -> usize {
        self.data().sibling_index
    }

    fn siblings(self) -> &'a [NodeId] {
        match self.data().parent {
            Some(parent) => &self.tree.nodes[parent].children,
            None => &[],
        }
    }
}

impl std::fmt::Debug for Capture<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capture")
            .field("token_id", &self.token_id())
            .field("span", &self.span())
            .field("value", &self.value())
            .finish()
    }
}

/// Sibling iterator returned by [`Capture::look_ahead`] and
/// [`Capture::look_behind`].
pub struct Siblings<'a, 'i> {
    tree: &'a ParseTree<'a>,
    ids: &'i [&'i str],
    nodes: std::slice::Iter<'a, NodeId>,
    reverse: bool,
}

impl<'a> Iterator for Siblings<'a, '_> {
    type Item = Capture<'a>;

    fn next(&mut self) -> Option<Capture<'a>> {
        loop {
            let next = if self.reverse {
                self.nodes.next_back()
            } else {
                self.nodes.next()
            };
            let capture = Capture {
                tree: self.tree,
                node: *next?,
            };
            if self.ids.is_empty() || capture.is(self.ids) {
                return Some(capture);
            }
        }
    }
}

/// Folded value waiting on an operand stack, with the occurrence that
/// produced it.
#[derive(Clone)]
pub struct Operand {
    pub node: NodeId,
    pub value: Value,
}

/// An operand seen from a precondition.
#[derive(Clone, Copy)]
pub struct OperandCapture<'a> {
    capture: Capture<'a>,
    value: &'a Value,
}

impl<'a> OperandCapture<'a> {
    pub fn production<T: 'static>(self) -> Option<&'a T> {
        self.value.downcast_ref::<T>()
    }
}

impl<'a> Deref for OperandCapture<'a> {
    type Target = Capture<'a>;

    fn deref(&self) -> &Capture<'a> {
        &self.capture
    }
}

/// Occurrence about to execute an operator rule.
///
/// `operands` is the operand stack of the enclosing occurrence, top last.
#[derive(Clone, Copy)]
pub struct OperatorCapture<'a> {
    capture: Capture<'a>,
    operands: &'a [Operand],
}

impl<'a> OperatorCapture<'a> {
    pub fn new(capture: Capture<'a>, operands: &'a [Operand]) -> Self {
        Self { capture, operands }
    }

    pub fn capture(self) -> Capture<'a> {
        self.capture
    }

    /// Top of the operand stack.
    pub fn operand(self) -> Option<OperandCapture<'a>> {
        self.at(self.operands.len().checked_sub(1)?)
    }

    /// Second from the top, when a right operand sits above it.
    pub fn left_operand(self) -> Option<OperandCapture<'a>> {
        self.at(self.operands.len().checked_sub(2)?)
    }

    /// Top of the stack, when a left operand sits below it.
    pub fn right_operand(self) -> Option<OperandCapture<'a>> {
        if self.operands.len() < 2 {
            return None;
        }
        self.operand()
    }

    pub fn has_operand(self) -> bool {
        self.operand().is_some()
    }

    pub fn has_left_operand(self) -> bool {
        self.left_operand().is_some()
    }

    pub fn has_right_operand(self) -> bool {
        self.right_operand().is_some()
    }

    fn at(self, index: usize) -> Option<OperandCapture<'a>> {
        let operand = self.operands.get(index)?;
        Some(OperandCapture {
            capture: Capture {
                tree: self.capture.tree,
                node: operand.node,
            },
            value: &operand.value,
        })
    }
}

impl<'a> Deref for OperatorCapture<'a> {
    type Target = Capture<'a>;

    fn deref(&self) -> &Capture<'a> {
        &self.capture
    }
}
