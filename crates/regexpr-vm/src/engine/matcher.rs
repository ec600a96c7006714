//! Occurrence enumeration.
//!
//! The native engine keeps only the last iteration of a repeated group, so
//! the match is read scope by scope. Captures of the root scope come from
//! the full match. Each repeat group found in a scope is walked iteration by
//! iteration with its `\G`-anchored body regex, and the captures of every
//! iteration come from that iteration's match. Iterations are split so that
//! their count stays within the quantifier bounds.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use fancy_regex::{Captures, Regex};
use regexpr_compiler::{Pattern, ROOT_KEY, RepeatGroup, Scope};
use regexpr_core::ParseTree;

use super::error::ParseError;
use super::trace::Tracer;

#[derive(Debug)]
pub(super) struct Regexes {
    pub regex: Regex,
    /// One per repeat group, same order as [`Pattern::repeats`].
    pub iterations: Vec<Regex>,
}

#[derive(Debug, Clone)]
struct Found {
    span: Range<usize>,
    depth: usize,
    slot: usize,
}

struct Scanner<'a, 'r, T: Tracer> {
    pattern: &'a Pattern,
    regexes: &'r Regexes,
    text: &'a str,
    tracer: &'r mut T,
    found: Vec<Found>,
    /// Repeat groups waiting to be iterated, with their spans.
    pending: Vec<(usize, Range<usize>)>,
}

pub(super) fn match_tree<'a, T: Tracer>(
    pattern: &'a Pattern,
    regexes: &Regexes,
    text: &'a str,
    tracer: &mut T,
) -> Result<ParseTree<'a>, ParseError> {
    let caps = regexes.regex.captures(text)?;
    let whole = caps
        .as_ref()
        .and_then(|caps| caps.get(0))
        .map(|m| m.range())
        .filter(|span| !span.is_empty());
    tracer.trace_match(whole.clone());
    let (Some(caps), Some(whole)) = (caps, whole) else {
        return Err(ParseError::NoMatch);
    };

    let mut scanner = Scanner {
        pattern,
        regexes,
        text,
        tracer,
        found: Vec::new(),
        pending: Vec::new(),
    };
    scanner.tracer.trace_scope(ROOT_KEY, whole.clone());
    scanner.collect(pattern.root_scope(), &caps);
    while let Some((repeat, span)) = scanner.pending.pop() {
        scanner.iterate(repeat, span)?;
    }

    let mut found = scanner.found;
    found.sort_by_key(|f| (f.span.start, f.depth));
    Ok(build_tree(pattern, text, whole, &found, tracer))
}

impl<'a, T: Tracer> Scanner<'a, '_, T> {
    /// Records the non-empty captures and repeat groups of `scope`.
    fn collect(&mut self, scope: &Scope, caps: &Captures<'_>) {
        for &slot in &scope.captures {
            let Some((id, capture)) = self.pattern.captures().get_index(slot) else {
                continue;
            };
            if let Some(m) = caps.name(id)
                && m.start() < m.end()
            {
                self.found.push(Found {
                    span: m.range(),
                    depth: capture.depth,
                    slot,
                });
            }
        }
        for &repeat in &scope.repeats {
            let Some(group) = self.pattern.repeats().get(repeat) else {
                continue;
            };
            if let Some(m) = caps.name(&group.id)
                && m.start() < m.end()
            {
                self.pending.push((repeat, m.range()));
            }
        }
    }

    fn iterate(&mut self, repeat: usize, span: Range<usize>) -> Result<(), ParseError> {
        let pattern = self.pattern;
        let regexes = self.regexes;
        let (Some(group), Some(regex)) =
            (pattern.repeats().get(repeat), regexes.iterations.get(repeat))
        else {
            return Ok(());
        };

        let iterations = match self.split(group, regex, span.clone())? {
            Some(iterations) => iterations,
            None => self.greedy(group, regex, span)?,
        };
        for (start, caps) in iterations {
            let end = caps.get(0).map_or(start, |m| m.end());
            self.tracer.trace_iteration(&group.id, start..end);
            self.collect(&group.scope, &caps);
        }
        Ok(())
    }

    /// Splits `span` into iterations whose count honors the quantifier.
    ///
    /// Candidates are tried longest first. A candidate that leaves no valid
    /// split of the rest is retried on input cut before its end. Positions
    /// known to lead nowhere are remembered, so each is explored once.
    fn split(
        &mut self,
        group: &RepeatGroup,
        regex: &Regex,
        span: Range<usize>,
    ) -> Result<Option<Vec<(usize, Captures<'a>)>>, ParseError> {
        // Past the lower bound an unbounded repeat accepts any further count.
        let state = |pos: usize, count: usize| match group.at_most {
            Some(_) => (pos, count),
            None => (pos, count.min(group.at_least)),
        };

        let mut chosen: Vec<(usize, Captures<'a>)> = Vec::new();
        let mut dead = HashSet::new();
        let mut pos = span.start;
        let mut cut = span.end;
        loop {
            let count = chosen.len();
            if pos == span.end && count >= group.at_least {
                return Ok(Some(chosen));
            }

            let room = group.at_most.is_none_or(|max| count < max);
            let candidate = if room && pos < span.end && !dead.contains(&state(pos, count)) {
                self.candidate(regex, &group.id, pos, cut, cut == span.end)?
            } else {
                None
            };

            match candidate {
                Some(caps) => {
                    let end = caps.get(0).map_or(pos, |m| m.end());
                    chosen.push((pos, caps));
                    pos = end;
                    cut = span.end;
                }
                None => {
                    dead.insert(state(pos, count));
                    let Some((start, caps)) = chosen.pop() else {
                        return Ok(None);
                    };
                    let end = caps.get(0).map_or(start, |m| m.end());
                    pos = start;
                    cut = previous_boundary(self.text, end);
                }
            }
        }
    }

    /// Iterates greedily up to `span.end`, ignoring the quantifier bounds.
    fn greedy(
        &mut self,
        group: &RepeatGroup,
        regex: &Regex,
        span: Range<usize>,
    ) -> Result<Vec<(usize, Captures<'a>)>, ParseError> {
        let mut iterations = Vec::new();
        let mut pos = span.start;
        while pos < span.end {
            let Some(caps) = self.candidate(regex, &group.id, pos, span.end, true)? else {
                self.tracer.trace_iteration_stop(&group.id, pos);
                break;
            };
            let Some(end) = caps.get(0).map(|m| m.end()) else {
                break;
            };
            iterations.push((pos, caps));
            pos = end;
        }
        Ok(iterations)
    }

    /// One non-empty iteration starting at `pos` and ending by `cut`.
    ///
    /// On a fresh attempt the body is matched against the full input first.
    /// A greedy body may run past the group when the text after it matches
    /// the body too; the step is then retried on input cut at `cut`.
    fn candidate(
        &mut self,
        regex: &Regex,
        id: &str,
        pos: usize,
        cut: usize,
        fresh: bool,
    ) -> Result<Option<Captures<'a>>, ParseError> {
        if fresh {
            let Some(caps) = regex.captures_from_pos(self.text, pos)? else {
                return Ok(None);
            };
            let Some(m) = caps.get(0) else {
                return Ok(None);
            };
            if m.end() <= cut {
                return Ok((m.end() > pos).then_some(caps));
            }
            self.tracer.trace_iteration_fallback(id, pos);
        }
        if cut <= pos {
            return Ok(None);
        }

        let truncated = &self.text[..cut];
        let caps = regex.captures_from_pos(truncated, pos)?;
        Ok(caps.filter(|caps| caps.get(0).is_some_and(|m| m.end() > pos)))
    }
}

/// Start of the last char before `at`.
fn previous_boundary(text: &str, at: usize) -> usize {
    text[..at].char_indices().next_back().map_or(0, |(i, _)| i)
}

/// Arranges the occurrences under the root, each below the latest
/// occurrence of its parent capture.
fn build_tree<'a, T: Tracer>(
    pattern: &'a Pattern,
    text: &'a str,
    whole: Range<usize>,
    found: &[Found],
    tracer: &mut T,
) -> ParseTree<'a> {
    let mut tree = ParseTree::new(text);
    let root = tree.push(0, "", ROOT_KEY, whole, None);
    let mut latest = HashMap::new();

    for f in found {
        let Some((id, slot)) = pattern.captures().get_index(f.slot) else {
            continue;
        };
        let parent = pattern
            .captures()
            .get_index_of(slot.parent_capture.as_str())
            .and_then(|p| latest.get(&p).copied())
            .unwrap_or(root);
        let token_id = pattern.tokens().get(slot.token).map_or("", |t| t.id());
        let node = tree.push(slot.token, token_id, id, f.span.clone(), Some(parent));
        latest.insert(f.slot, node);
        tracer.trace_occurrence(tree.capture(node));
    }
    tree
}
