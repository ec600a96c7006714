//! Tracing hooks for matching and folding.
//!
//! The parser is generic over [`Tracer`]. With [`NoopTracer`] every hook is
//! an empty `#[inline(always)]` function and the calls compile away;
//! [`PrintTracer`] collects human-readable lines instead.

use std::ops::Range;

use regexpr_core::{Capture, Colors, RuleKind};

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Match result, rule selection, productions. No text.
    #[default]
    Default,
    /// Adds scopes, iterations and operator stack moves. Text on occurrences.
    Verbose,
    /// Text on everything.
    VeryVerbose,
}

/// Instrumentation points of a parse.
///
/// Hooks receive data the engine already has; formatting happens in the
/// implementation.
pub trait Tracer {
    /// Called once with the span of the full match, `None` on failure.
    fn trace_match(&mut self, span: Option<Range<usize>>);

    /// Called when captures are read from a scope match (`"0"` is the root).
    fn trace_scope(&mut self, scope: &str, span: Range<usize>);

    /// Called for each accepted repeat iteration.
    fn trace_iteration(&mut self, repeat: &str, span: Range<usize>);

    /// Called when an iteration overshot the repeat span and is retried on
    /// truncated input.
    fn trace_iteration_fallback(&mut self, repeat: &str, at: usize);

    /// Called when no further iteration matches inside the repeat span.
    fn trace_iteration_stop(&mut self, repeat: &str, at: usize);

    /// Called when an occurrence is added to the parse tree.
    fn trace_occurrence(&mut self, capture: Capture<'_>);

    /// Called after rule selection; `None` means the text becomes the value.
    fn trace_rule(&mut self, capture: Capture<'_>, kind: Option<RuleKind>);

    /// Called when an operator or left delimiter waits on the operator stack.
    fn trace_operator_push(&mut self, capture: Capture<'_>);

    /// Called when a waiting operator is popped for execution.
    fn trace_unwind(&mut self, capture: Capture<'_>);

    /// Called right before a rule executes with `operands` popped values.
    fn trace_execute(&mut self, capture: Capture<'_>, kind: RuleKind, operands: usize);

    /// Called when a folded value reaches the output.
    fn trace_production(&mut self, capture: Capture<'_>, top_level: bool);
}

/// Tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_match(&mut self, _span: Option<Range<usize>>) {}

    #[inline(always)]
    fn trace_scope(&mut self, _scope: &str, _span: Range<usize>) {}

    #[inline(always)]
    fn trace_iteration(&mut self, _repeat: &str, _span: Range<usize>) {}

    #[inline(always)]
    fn trace_iteration_fallback(&mut self, _repeat: &str, _at: usize) {}

    #[inline(always)]
    fn trace_iteration_stop(&mut self, _repeat: &str, _at: usize) {}

    #[inline(always)]
    fn trace_occurrence(&mut self, _capture: Capture<'_>) {}

    #[inline(always)]
    fn trace_rule(&mut self, _capture: Capture<'_>, _kind: Option<RuleKind>) {}

    #[inline(always)]
    fn trace_operator_push(&mut self, _capture: Capture<'_>) {}

    #[inline(always)]
    fn trace_unwind(&mut self, _capture: Capture<'_>) {}

    #[inline(always)]
    fn trace_execute(&mut self, _capture: Capture<'_>, _kind: RuleKind, _operands: usize) {}

    #[inline(always)]
    fn trace_production(&mut self, _capture: Capture<'_>, _top_level: bool) {}
}

const TEXT_BUDGET: usize = 32;

/// Tracer that collects trace lines for display.
pub struct PrintTracer {
    verbosity: Verbosity,
    colors: Colors,
    lines: Vec<String>,
}

impl PrintTracer {
    pub fn new(verbosity: Verbosity, colors: Colors) -> Self {
        Self {
            verbosity,
            colors,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn print(&self) {
        for line in &self.lines {
            println!("{line}");
        }
    }

    fn verbose(&self) -> bool {
        self.verbosity != Verbosity::Default
    }

    fn span(&self, span: &Range<usize>) -> String {
        let c = &self.colors;
        c.paint(c.dim, &format!("{}..{}", span.start, span.end))
    }

    /// `TOKEN 3..5`, plus the text when the verbosity asks for it.
    fn describe(&self, capture: Capture<'_>, with_text: bool) -> String {
        let c = &self.colors;
        let name = if capture.token_id().is_empty() {
            capture.capture_id()
        } else {
            capture.token_id()
        };
        let mut out = format!("{} {}", c.paint(c.blue, name), self.span(&capture.span()));
        if with_text {
            out.push(' ');
            out.push_str(&c.paint(c.green, &truncate(capture.value(), TEXT_BUDGET)));
        }
        out
    }

    fn push(&mut self, symbol: &str, content: String) {
        self.lines.push(format!("  {symbol} {content}"));
    }
}

impl Tracer for PrintTracer {
    fn trace_match(&mut self, span: Option<Range<usize>>) {
        let line = match span {
            Some(span) => format!("match {}", self.span(&span)),
            None => {
                let c = &self.colors;
                c.paint(c.red, "no match")
            }
        };
        self.lines.push(line);
    }

    fn trace_scope(&mut self, scope: &str, span: Range<usize>) {
        if !self.verbose() {
            return;
        }
        let content = format!("scope {scope} {}", self.span(&span));
        self.push("@", content);
    }

    fn trace_iteration(&mut self, repeat: &str, span: Range<usize>) {
        if !self.verbose() {
            return;
        }
        let content = format!("{repeat} {}", self.span(&span));
        self.push("*", content);
    }

    fn trace_iteration_fallback(&mut self, repeat: &str, at: usize) {
        if !self.verbose() {
            return;
        }
        self.push("*", format!("{repeat} overshoot at {at}, retrying truncated"));
    }

    fn trace_iteration_stop(&mut self, repeat: &str, at: usize) {
        if !self.verbose() {
            return;
        }
        self.push("*", format!("{repeat} stops at {at}"));
    }

    fn trace_occurrence(&mut self, capture: Capture<'_>) {
        if self.verbosity != Verbosity::VeryVerbose {
            return;
        }
        let content = self.describe(capture, true);
        self.push("+", content);
    }

    fn trace_rule(&mut self, capture: Capture<'_>, kind: Option<RuleKind>) {
        let rule = match kind {
            Some(kind) => format!("{kind:?}"),
            None => "text".to_owned(),
        };
        let content = format!("{} {rule}", self.describe(capture, self.verbose()));
        self.push("?", content);
    }

    fn trace_operator_push(&mut self, capture: Capture<'_>) {
        if !self.verbose() {
            return;
        }
        let content = self.describe(capture, false);
        self.push("<", content);
    }

    fn trace_unwind(&mut self, capture: Capture<'_>) {
        if !self.verbose() {
            return;
        }
        let content = self.describe(capture, false);
        self.push(">", content);
    }

    fn trace_execute(&mut self, capture: Capture<'_>, kind: RuleKind, operands: usize) {
        if self.verbosity != Verbosity::VeryVerbose {
            return;
        }
        let content = format!("{} {kind:?}/{operands}", self.describe(capture, false));
        self.push("!", content);
    }

    fn trace_production(&mut self, capture: Capture<'_>, top_level: bool) {
        let marker = if top_level { "=" } else { "-" };
        let content = self.describe(capture, self.verbosity == Verbosity::VeryVerbose);
        self.push(marker, content);
    }
}

/// Cuts `text` to `max` chars, escaping line breaks.
fn truncate(text: &str, max: usize) -> String {
    let escaped = text.replace('\r', "\\r").replace('\n', "\\n");
    if escaped.chars().count() <= max {
        return escaped;
    }
    let mut out: String = escaped.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
