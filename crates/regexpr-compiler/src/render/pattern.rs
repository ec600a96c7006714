//! The render artifact.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use regexpr_core::Token;
use serde::Serialize;

/// Key of the synthetic root capture.
pub const ROOT_KEY: &str = "0";

/// One named capture group of the pattern.
#[derive(Debug, Clone)]
pub struct CaptureSlot {
    /// Index of the owning token in [`Pattern::tokens`].
    pub token: usize,
    pub parent_token: usize,
    /// Group name of the enclosing capture, [`ROOT_KEY`] at top level.
    pub parent_capture: String,
    /// Token nesting depth; top-level captures have depth 1.
    pub depth: usize,
}

/// Captures and repeat groups whose occurrences are read from the same match.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// Indices into [`Pattern::captures`].
    pub captures: Vec<usize>,
    /// Indices into [`Pattern::repeats`].
    pub repeats: Vec<usize>,
}

/// A repeat whose body holds captures.
///
/// The repeat is wrapped in a named group so its span is known after a
/// match; `body` is re-matched once per iteration to recover the captures
/// the engine overwrote.
#[derive(Debug, Clone)]
pub struct RepeatGroup {
    pub id: String,
    pub body: String,
    /// Iteration count bounds of the quantifier.
    pub at_least: usize,
    pub at_most: Option<usize>,
    pub scope: Scope,
}

#[derive(Debug, Clone)]
pub struct Pattern {
    pub(super) source: String,
    pub(super) tokens: Vec<Arc<Token>>,
    pub(super) captures: IndexMap<String, CaptureSlot>,
    pub(super) children: IndexMap<usize, IndexSet<usize>>,
    pub(super) repeats: Vec<RepeatGroup>,
    pub(super) root_scope: Scope,
}

impl Pattern {
    /// Native pattern text, without the multi-line flag the parser adds.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Tokens in order of first appearance. Index 0 is the synthetic root.
    pub fn tokens(&self) -> &[Arc<Token>] {
        &self.tokens
    }

    pub fn captures(&self) -> &IndexMap<String, CaptureSlot> {
        &self.captures
    }

    pub fn capture(&self, id: &str) -> Option<&CaptureSlot> {
        self.captures.get(id)
    }

    /// Tokens captured directly inside `token`.
    pub fn children(&self, token: usize) -> impl Iterator<Item = usize> + '_ {
        self.children
            .get(&token)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn repeats(&self) -> &[RepeatGroup] {
        &self.repeats
    }

    pub fn root_scope(&self) -> &Scope {
        &self.root_scope
    }

    pub fn dump(&self) -> PatternDump<'_> {
        PatternDump {
            pattern: &self.source,
            captures: self
                .captures
                .iter()
                .map(|(id, slot)| CaptureDump {
                    id,
                    token: self.tokens.get(slot.token).map_or("", |t| t.id()),
                    parent: &slot.parent_capture,
                    depth: slot.depth,
                })
                .collect(),
            repeats: self
                .repeats
                .iter()
                .map(|r| RepeatDump {
                    id: &r.id,
                    body: &r.body,
                    scope: self.dump_scope(&r.scope),
                })
                .collect(),
            root: self.dump_scope(&self.root_scope),
        }
    }

    fn dump_scope(&self, scope: &Scope) -> ScopeDump<'_> {
        ScopeDump {
            captures: scope
                .captures
                .iter()
                .filter_map(|&i| self.captures.get_index(i).map(|(id, _)| id.as_str()))
                .collect(),
            repeats: scope
                .repeats
                .iter()
                .filter_map(|&i| self.repeats.get(i).map(|r| r.id.as_str()))
                .collect(),
        }
    }
}

/// Serializable view of a [`Pattern`].
#[derive(Debug, Serialize)]
pub struct PatternDump<'a> {
    pub pattern: &'a str,
    pub captures: Vec<CaptureDump<'a>>,
    pub repeats: Vec<RepeatDump<'a>>,
    pub root: ScopeDump<'a>,
}

#[derive(Debug, Serialize)]
pub struct CaptureDump<'a> {
    pub id: &'a str,
    pub token: &'a str,
    pub parent: &'a str,
    pub depth: usize,
}

#[derive(Debug, Serialize)]
pub struct RepeatDump<'a> {
    pub id: &'a str,
    pub body: &'a str,
    #[serde(flatten)]
    pub scope: ScopeDump<'a>,
}

#[derive(Debug, Serialize)]
pub struct ScopeDump<'a> {
    pub captures: Vec<&'a str>,
    pub repeats: Vec<&'a str>,
}
