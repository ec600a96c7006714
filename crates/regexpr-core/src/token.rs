//! Tokens: named captures that carry production rules.

use std::fmt;
use std::sync::Arc;

use crate::capture::Capture;
use crate::expr::{Expr, ExprKind};
use crate::rule::ProductionRule;

/// How a token consumes leading whitespace.
#[derive(Debug, Clone, Default)]
pub enum WsPolicy {
    Disabled,
    /// Uses the default whitespace expression given at render time.
    #[default]
    Default,
    Custom(Expr),
}

/// A capture boundary with an id, a whitespace policy and a rule set.
///
/// An empty id makes the token anonymous: it still skips whitespace but
/// never captures. A token without an expression only skips whitespace.
pub struct Token {
    id: String,
    ws: WsPolicy,
    expr: Option<Expr>,
    rules: Vec<Box<dyn ProductionRule>>,
    default_rule: Option<Box<dyn ProductionRule>>,
}

impl Token {
    pub fn new(id: impl Into<String>, expr: impl Into<Expr>) -> Self {
        Self {
            id: id.into(),
            ws: WsPolicy::Default,
            expr: Some(expr.into()),
            rules: Vec::new(),
            default_rule: None,
        }
    }

    pub fn anonymous(expr: impl Into<Expr>) -> Self {
        Self::new(String::new(), expr)
    }

    /// Anonymous token without an expression.
    pub fn skip_ws() -> Self {
        Self {
            id: String::new(),
            ws: WsPolicy::Default,
            expr: None,
            rules: Vec::new(),
            default_rule: None,
        }
    }

    pub fn ws(mut self, ws: WsPolicy) -> Self {
        self.ws = ws;
        self
    }

    pub fn no_ws(self) -> Self {
        self.ws(WsPolicy::Disabled)
    }

    pub fn rule(mut self, rule: impl ProductionRule + 'static) -> Self {
        self.add_rule(rule);
        self
    }

    /// Registers a rule. A rule without a selector replaces the default.
    pub fn add_rule(&mut self, rule: impl ProductionRule + 'static) {
        if rule.has_selector() {
            self.rules.push(Box::new(rule));
        } else {
            self.default_rule = Some(Box::new(rule));
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_anonymous(&self) -> bool {
        self.id.is_empty()
    }

    pub fn ws_policy(&self) -> &WsPolicy {
        &self.ws
    }

    pub fn expr(&self) -> Option<&Expr> {
        self.expr.as_ref()
    }

    pub fn has_rules(&self) -> bool {
        self.default_rule.is_some() || !self.rules.is_empty()
    }

    /// First selector rule that accepts `capture`, else the default rule.
    pub fn select_rule(&self, capture: Capture<'_>) -> Option<&dyn ProductionRule> {
        self.rules
            .iter()
            .find(|rule| rule.select(capture))
            .or(self.default_rule.as_ref())
            .map(|rule| &**rule)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("id", &self.id)
            .field("ws", &self.ws)
            .field("expr", &self.expr)
            .field("rules", &(self.rules.len() + usize::from(self.default_rule.is_some())))
            .finish()
    }
}

impl From<Token> for Expr {
    fn from(token: Token) -> Self {
        Expr::new(ExprKind::Token(Arc::new(token)))
    }
}
