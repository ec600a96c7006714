//! Iterative tree walk.
//!
//! Every node goes through three hooks: `begin` writes the opening syntax
//! and returns the children, `between` runs before each child after the
//! first (missing children included), and `end` writes the closing syntax.
//! The walk keeps an explicit frame stack, so deep trees cannot overflow
//! the native stack.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use regexpr_core::{Direction, Expr, ExprKind, Repeat, Token, WsPolicy};

use super::RenderError;
use super::capture_id::CaptureIds;
use super::pattern::{CaptureSlot, Pattern, ROOT_KEY, RepeatGroup, Scope};

pub const DEFAULT_CAPTURE_PREFIX: &str = "t";

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    default_ws: Option<Expr>,
    capture_prefix: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            default_ws: None,
            capture_prefix: DEFAULT_CAPTURE_PREFIX.to_owned(),
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whitespace skipped before tokens with the `Default` policy.
    pub fn default_ws(mut self, ws: Expr) -> Self {
        self.default_ws = Some(ws);
        self
    }

    /// Prefix of token capture names. Must start with a letter.
    pub fn capture_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.capture_prefix = prefix.into();
        self
    }

    pub fn render(&self, expr: &Expr) -> Result<Pattern, RenderError> {
        Renderer::new(self).run(expr)
    }
}

/// Renders `expr` with an optional default whitespace expression.
pub fn render(expr: &Expr, default_ws: Option<&Expr>) -> Result<Pattern, RenderError> {
    let mut options = RenderOptions::new();
    if let Some(ws) = default_ws {
        options = options.default_ws(ws.clone());
    }
    options.render(expr)
}

struct Frame {
    children: Vec<Option<Expr>>,
    next: usize,
    state: State,
}

enum State {
    Leaf,
    Sequence,
    Choice,
    Range {
        bracketed: bool,
    },
    Set {
        positives: usize,
        negatives: usize,
    },
    Repeat {
        at_least: usize,
        at_most: Option<usize>,
        wrapped: bool,
        group: Option<usize>,
        body_start: usize,
    },
    Assertion,
    Token {
        token: Arc<Token>,
        index: usize,
        ws: bool,
        ws_grouped: bool,
        default_ws: bool,
        capture: bool,
    },
}

impl Frame {
    fn new(children: Vec<Option<Expr>>, state: State) -> Self {
        Self {
            children,
            next: 0,
            state,
        }
    }

    fn leaf() -> Self {
        Self::new(Vec::new(), State::Leaf)
    }
}

struct Renderer<'o> {
    options: &'o RenderOptions,
    out: String,
    ids: CaptureIds,
    tokens: Vec<Arc<Token>>,
    token_index: HashMap<*const Token, usize>,
    captures: IndexMap<String, CaptureSlot>,
    children: IndexMap<usize, IndexSet<usize>>,
    repeats: Vec<RepeatGroup>,
    /// Open scopes; the root scope sits at the bottom.
    scopes: Vec<Scope>,
    /// Open capturing tokens as `(token, capture)` indices.
    open: Vec<(usize, usize)>,
    assert_mode: bool,
    class_depth: usize,
    /// Number of default-whitespace subtrees being rendered.
    in_default_ws: usize,
}

impl<'o> Renderer<'o> {
    fn new(options: &'o RenderOptions) -> Self {
        Self {
            options,
            out: String::new(),
            ids: CaptureIds::new(options.capture_prefix.clone()),
            tokens: Vec::new(),
            token_index: HashMap::new(),
            captures: IndexMap::new(),
            children: IndexMap::new(),
            repeats: Vec::new(),
            scopes: Vec::new(),
            open: Vec::new(),
            assert_mode: false,
            class_depth: 0,
            in_default_ws: 0,
        }
    }

    fn run(mut self, root: &Expr) -> Result<Pattern, RenderError> {
        // Synthetic root: parent of every top-level capture.
        let root_token = Arc::new(Token::anonymous(root.clone()).no_ws());
        self.intern(&root_token);
        self.scopes.push(Scope::default());

        let mut stack = vec![self.begin(root)?];
        while let Some(top) = stack.last_mut() {
            let index = top.next;
            if index < top.children.len() {
                top.next += 1;
                if index > 0 {
                    self.between(top, index)?;
                }
                if let Some(child) = top.children[index].clone() {
                    let frame = self.begin(&child)?;
                    stack.push(frame);
                }
                continue;
            }
            if let Some(frame) = stack.pop() {
                self.end(frame);
            }
        }

        let root_scope = self.scopes.pop().unwrap_or_default();
        Ok(Pattern {
            source: self.out,
            tokens: self.tokens,
            captures: self.captures,
            children: self.children,
            repeats: self.repeats,
            root_scope,
        })
    }

    fn begin(&mut self, expr: &Expr) -> Result<Frame, RenderError> {
        let frame = match expr.kind() {
            ExprKind::Literal(lit) => {
                self.out.push_str(lit.pattern());
                Frame::leaf()
            }
            ExprKind::CharLiteral(lit) => {
                if self.class_depth > 0 {
                    self.out.push_str(lit.chars());
                } else {
                    self.out.push('[');
                    self.out.push_str(lit.chars());
                    self.out.push(']');
                }
                Frame::leaf()
            }
            ExprKind::CharRange(range) => {
                let bracketed = self.class_depth == 0;
                if bracketed {
                    self.out.push('[');
                }
                self.class_depth += 1;
                Frame::new(
                    vec![Some(range.lower().clone()), Some(range.upper().clone())],
                    State::Range { bracketed },
                )
            }
            ExprKind::CharSet(set) => {
                let set = set.eval().ok_or(RenderError::CharClassEval)?;
                let positives = set.positives().len();
                let negatives = set.negatives().len();
                self.out.push_str(if positives == 0 { "[^" } else { "[" });
                self.class_depth += 1;
                let children = set
                    .positives()
                    .iter()
                    .chain(set.negatives())
                    .cloned()
                    .map(Some)
                    .collect();
                Frame::new(
                    children,
                    State::Set {
                        positives,
                        negatives,
                    },
                )
            }
            ExprKind::Sequence(items) => {
                Frame::new(items.iter().cloned().map(Some).collect(), State::Sequence)
            }
            ExprKind::Choice(items) => {
                self.out.push_str("(?:");
                Frame::new(items.iter().cloned().map(Some).collect(), State::Choice)
            }
            ExprKind::Repeat(rep) => self.begin_repeat(rep)?,
            ExprKind::Assertion(assertion) => {
                if self.assert_mode {
                    return Err(RenderError::NestedAssert);
                }
                self.out.push_str(
                    match (assertion.direction(), assertion.is_negated()) {
                        (Direction::Ahead, false) => "(?=",
                        (Direction::Ahead, true) => "(?!",
                        (Direction::Behind, false) => "(?<=",
                        (Direction::Behind, true) => "(?<!",
                    },
                );
                self.assert_mode = true;
                Frame::new(vec![Some(assertion.child().clone())], State::Assertion)
            }
            ExprKind::Token(token) => self.begin_token(token),
        };
        Ok(frame)
    }

    fn between(&mut self, frame: &mut Frame, index: usize) -> Result<(), RenderError> {
        match &mut frame.state {
            State::Choice => self.out.push('|'),
            State::Range { .. } => self.out.push('-'),
            State::Set {
                positives,
                negatives,
            } => {
                if index == *positives && *positives > 0 && *negatives > 0 {
                    self.out.push_str("&&[^");
                }
            }
            State::Token {
                token,
                index: token_index,
                ws_grouped,
                default_ws,
                capture,
                ..
            } => {
                if *ws_grouped {
                    self.out.push(')');
                }
                if *default_ws {
                    self.in_default_ws -= 1;
                }
                if token.expr().is_none() {
                    return Ok(());
                }
                if self.assert_mode || token.is_anonymous() {
                    self.out.push_str("(?:");
                    return Ok(());
                }
                let id = self.open_capture(token.id(), *token_index)?;
                self.out.push_str("(?<");
                self.out.push_str(&id);
                self.out.push('>');
                *capture = true;
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, frame: Frame) {
        match frame.state {
            State::Leaf | State::Sequence => {}
            State::Choice => self.out.push(')'),
            State::Range { bracketed } => {
                self.class_depth -= 1;
                if bracketed {
                    self.out.push(']');
                }
            }
            State::Set {
                positives,
                negatives,
            } => {
                self.class_depth -= 1;
                self.out.push(']');
                if positives > 0 && negatives > 0 {
                    self.out.push(']');
                }
            }
            State::Repeat {
                at_least,
                at_most,
                wrapped,
                group,
                body_start,
            } => {
                let body = self.out[body_start..].to_owned();
                if wrapped {
                    self.out.push(')');
                }
                self.out.push_str(&quantifier(at_least, at_most));
                if let Some(group) = group {
                    self.out.push(')');
                    let scope = self.scopes.pop().unwrap_or_default();
                    if let Some(repeat) = self.repeats.get_mut(group) {
                        repeat.body = body;
                        repeat.scope = scope;
                    }
                }
            }
            State::Assertion => {
                self.out.push(')');
                self.assert_mode = false;
            }
            State::Token {
                token, ws, capture, ..
            } => {
                if token.expr().is_some() {
                    self.out.push(')');
                }
                if ws {
                    self.out.push(')');
                }
                if capture {
                    self.open.pop();
                }
            }
        }
    }

    fn begin_repeat(&mut self, rep: &Repeat) -> Result<Frame, RenderError> {
        let child = rep.child();
        if matches!(child.kind(), ExprKind::Repeat(_)) {
            return Err(RenderError::NestedRepeat);
        }

        let group = if !self.assert_mode && self.contains_capture(child) {
            let id = self.ids.repeat()?;
            let index = self.repeats.len();
            if let Some(scope) = self.scopes.last_mut() {
                scope.repeats.push(index);
            }
            self.scopes.push(Scope::default());
            self.out.push_str("(?<");
            self.out.push_str(&id);
            self.out.push('>');
            self.repeats.push(RepeatGroup {
                id,
                body: String::new(),
                at_least: rep.at_least(),
                at_most: rep.at_most(),
                scope: Scope::default(),
            });
            Some(index)
        } else {
            None
        };

        let wrapped = needs_group(child);
        if wrapped {
            self.out.push_str("(?:");
        }
        Ok(Frame::new(
            vec![Some(child.clone())],
            State::Repeat {
                at_least: rep.at_least(),
                at_most: rep.at_most(),
                wrapped,
                group,
                body_start: self.out.len(),
            },
        ))
    }

    fn begin_token(&mut self, token: &Arc<Token>) -> Frame {
        let index = self.intern(token);
        let (ws, default_ws) = match token.ws_policy() {
            WsPolicy::Disabled => (None, false),
            WsPolicy::Default if self.in_default_ws > 0 => (None, false),
            WsPolicy::Default => (self.options.default_ws.clone(), true),
            WsPolicy::Custom(expr) => (Some(expr.clone()), false),
        };
        let default_ws = default_ws && ws.is_some();
        let ws_grouped = !self.assert_mode
            && ws
                .as_ref()
                .is_some_and(|e| matches!(e.kind(), ExprKind::Literal(_) | ExprKind::Sequence(_)));

        if ws.is_some() {
            self.out.push_str("(?:");
        }
        if ws_grouped {
            self.out.push_str("(?:");
        }
        if default_ws {
            self.in_default_ws += 1;
        }

        Frame::new(
            vec![ws.clone(), token.expr().cloned()],
            State::Token {
                token: token.clone(),
                index,
                ws: ws.is_some(),
                ws_grouped,
                default_ws,
                capture: false,
            },
        )
    }

    /// Registers a capture of `token` under the innermost open capture.
    fn open_capture(&mut self, token_id: &str, token: usize) -> Result<String, RenderError> {
        let id = self.ids.token(token_id)?;
        let (parent_token, parent_capture) = match self.open.last() {
            Some(&(parent, capture)) => (
                parent,
                self.captures
                    .get_index(capture)
                    .map_or_else(|| ROOT_KEY.to_owned(), |(id, _)| id.clone()),
            ),
            None => (0, ROOT_KEY.to_owned()),
        };

        self.children.entry(parent_token).or_default().insert(token);
        let (slot, _) = self.captures.insert_full(
            id.clone(),
            CaptureSlot {
                token,
                parent_token,
                parent_capture,
                depth: self.open.len() + 1,
            },
        );
        if let Some(scope) = self.scopes.last_mut() {
            scope.captures.push(slot);
        }
        self.open.push((token, slot));
        Ok(id)
    }

    fn intern(&mut self, token: &Arc<Token>) -> usize {
        let key = Arc::as_ptr(token);
        if let Some(&index) = self.token_index.get(&key) {
            return index;
        }
        let index = self.tokens.len();
        self.tokens.push(token.clone());
        self.token_index.insert(key, index);
        index
    }

    fn ws_expr(&self, token: &Token) -> Option<Expr> {
        match token.ws_policy() {
            WsPolicy::Disabled => None,
            WsPolicy::Default => self.options.default_ws.clone(),
            WsPolicy::Custom(expr) => Some(expr.clone()),
        }
    }

    /// True when rendering `expr` outside an assertion emits a named capture.
    fn contains_capture(&self, expr: &Expr) -> bool {
        let mut work = vec![expr.clone()];
        while let Some(expr) = work.pop() {
            match expr.kind() {
                ExprKind::Sequence(items) | ExprKind::Choice(items) => {
                    work.extend(items.iter().cloned());
                }
                ExprKind::Repeat(rep) => work.push(rep.child().clone()),
                ExprKind::Token(token) => {
                    if let Some(inner) = token.expr() {
                        if !token.is_anonymous() {
                            return true;
                        }
                        work.push(inner.clone());
                    }
                    if self.in_default_ws == 0 {
                        work.extend(self.ws_expr(token));
                    }
                }
                _ => {}
            }
        }
        false
    }
}

/// True when a quantifier cannot follow the rendered child directly.
fn needs_group(child: &Expr) -> bool {
    match child.kind() {
        ExprKind::Sequence(_) | ExprKind::Assertion(_) => true,
        ExprKind::Literal(lit) => !lit.is_atomic(),
        ExprKind::Token(token) => token.expr().is_none(),
        _ => false,
    }
}

fn quantifier(at_least: usize, at_most: Option<usize>) -> String {
    match (at_least, at_most) {
        (0, Some(1)) => "?".to_owned(),
        (0, None) => "*".to_owned(),
        (1, None) => "+".to_owned(),
        (n, None) => format!("{{{n},}}"),
        (n, Some(m)) if n == m => format!("{{{n}}}"),
        (n, Some(m)) => format!("{{{n},{m}}}"),
    }
}
