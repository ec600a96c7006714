use fancy_regex::{Regex, RegexBuilder};
use regexpr_compiler::Pattern;
use regexpr_core::ParseTree;

use super::error::{CompileError, ParseError};
use super::fold;
use super::matcher::{self, Regexes};
use super::productions::Productions;
use super::trace::{NoopTracer, Tracer};

pub const DEFAULT_BACKTRACK_LIMIT: usize = 1_000_000;

/// Builder for a [`Parser`] with engine limits.
#[derive(Debug)]
pub struct ParserBuilder {
    pattern: Pattern,
    backtrack_limit: usize,
    delegate_size_limit: Option<usize>,
}

impl ParserBuilder {
    /// Maximum backtracking steps per native match. Exhausting it fails the
    /// parse with [`ParseError::Engine`].
    pub fn backtrack_limit(mut self, limit: usize) -> Self {
        self.backtrack_limit = limit;
        self
    }

    /// Size limit of the compiled delegate automata.
    pub fn delegate_size_limit(mut self, limit: usize) -> Self {
        self.delegate_size_limit = Some(limit);
        self
    }

    pub fn build(self) -> Result<Parser, CompileError> {
        let regex = self.compile(format!("(?m){}", self.pattern.source()))?;
        let iterations = self
            .pattern
            .repeats()
            .iter()
            .map(|repeat| self.compile(format!(r"(?m)\G(?:{})", repeat.body)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Parser {
            pattern: self.pattern,
            regexes: Regexes { regex, iterations },
        })
    }

    fn compile(&self, source: String) -> Result<Regex, CompileError> {
        let mut builder = RegexBuilder::new(&source);
        builder.backtrack_limit(self.backtrack_limit);
        if let Some(limit) = self.delegate_size_limit {
            builder.delegate_size_limit(limit);
        }
        builder.build().map_err(|err| CompileError {
            pattern: source.clone(),
            message: err.to_string(),
        })
    }
}

/// A compiled pattern, reusable across inputs and threads.
#[derive(Debug)]
pub struct Parser {
    pattern: Pattern,
    regexes: Regexes,
}

impl Parser {
    pub fn new(pattern: Pattern) -> Result<Self, CompileError> {
        Self::builder(pattern).build()
    }

    pub fn builder(pattern: Pattern) -> ParserBuilder {
        ParserBuilder {
            pattern,
            backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
            delegate_size_limit: None,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Matches `input` and folds every capture occurrence into productions.
    ///
    /// Uses `NoopTracer`, so tracing costs nothing.
    pub fn parse(&self, input: &str) -> Result<Productions<'_>, ParseError> {
        self.parse_with(input, &mut NoopTracer)
    }

    /// Like [`Parser::parse`], reporting each step to `tracer`.
    pub fn parse_with<T: Tracer>(
        &self,
        input: &str,
        tracer: &mut T,
    ) -> Result<Productions<'_>, ParseError> {
        let tree = self.occurrences_with(input, tracer)?;
        fold::fold(&tree, self.pattern.tokens(), tracer)
    }

    /// Matches `input` and returns the capture occurrences without folding.
    pub fn occurrences<'a>(&'a self, input: &'a str) -> Result<ParseTree<'a>, ParseError> {
        self.occurrences_with(input, &mut NoopTracer)
    }

    pub fn occurrences_with<'a, T: Tracer>(
        &'a self,
        input: &'a str,
        tracer: &mut T,
    ) -> Result<ParseTree<'a>, ParseError> {
        matcher::match_tree(&self.pattern, &self.regexes, input, tracer)
    }
}
