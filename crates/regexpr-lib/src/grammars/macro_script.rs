//! Line-oriented macro scripts.
//!
//! A script mixes statement lines of the form
//! `//# <type> [arg...] [=> code]` with free code lines. Arguments are bare
//! words or double-quoted strings; quoted arguments keep escaped quotes.

use std::sync::OnceLock;

use regexpr_core::action::{capture, create, update};
use regexpr_core::{Expr, Rule, Token, WsPolicy, char_literal, char_set, look_ahead};
use regexpr_vm::{ParseError, Parser, Productions};

use crate::consts::{
    char_cr, char_horiz_space, char_lf, char_space, char_word, end_of_file, line, line_break,
    skip_ws, start_of_line,
};
use crate::{Result, compile};

pub const MACRO: &str = "MACRO";
pub const CODE: &str = "CODE";
pub const STATEMENT: &str = "STATEMENT";
pub const STATEMENT_TYPE: &str = "STATEMENT_TYPE";
pub const STATEMENT_ARG: &str = "STATEMENT_ARG";
pub const STATEMENT_ARG_VALUE: &str = "STATEMENT_ARG_VALUE";
pub const STATEMENT_CODE: &str = "STATEMENT_CODE";
pub const STATEMENT_CODE_VALUE: &str = "STATEMENT_CODE_VALUE";

pub const SAMPLE: &str = r#"//# thread ui
//# ref "System.Windows" System.Windows.Forms
var window = GetWindow();
//# wait 5000 => window.IsVisible
//# quit"#;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatementType {
    #[default]
    Unknown,
    Macro,
    Thread,
    Reference,
    Using,
    Var,
    Service,
    Call,
    Wait,
    Ui,
    Quit,
}

impl StatementType {
    /// Case-insensitive; `ref` is short for `reference`.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.to_ascii_lowercase().as_str() {
            "macro" => Self::Macro,
            "thread" => Self::Thread,
            "ref" | "reference" => Self::Reference,
            "using" => Self::Using,
            "var" => Self::Var,
            "service" => Self::Service,
            "call" => Self::Call,
            "wait" => Self::Wait,
            "ui" => Self::Ui,
            "quit" => Self::Quit,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statement {
    pub kind: StatementType,
    pub args: Vec<String>,
    /// Text after `=>`.
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeLine(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroLine {
    Statement(Statement),
    Code(String),
}

/// Script lines in document order. Blank code lines are not kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroLines {
    lines: Vec<MacroLine>,
}

impl MacroLines {
    pub fn push(&mut self, line: MacroLine) {
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MacroLine> {
        self.lines.iter()
    }

    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.lines.iter().filter_map(|line| match line {
            MacroLine::Statement(s) => Some(s),
            MacroLine::Code(_) => None,
        })
    }
}

impl<'a> IntoIterator for &'a MacroLines {
    type Item = &'a MacroLine;
    type IntoIter = std::slice::Iter<'a, MacroLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

static PARSER: OnceLock<Result<Parser>> = OnceLock::new();

pub fn parser() -> Result<&'static Parser> {
    PARSER.get_or_init(build).as_ref().map_err(Clone::clone)
}

pub fn parse(input: &str) -> Result<MacroLines> {
    let productions = parser()?.parse(input)?;
    Ok(productions
        .get_as::<MacroLines>(MACRO)
        .cloned()
        .ok_or(ParseError::NoMatch)?)
}

pub(super) fn show(productions: &Productions<'_>) -> String {
    let Some(lines) = productions.get_as::<MacroLines>(MACRO) else {
        return String::new();
    };
    lines
        .iter()
        .map(|line| match line {
            MacroLine::Statement(s) => {
                let mut out = format!("{:?} {:?}", s.kind, s.args);
                if let Some(code) = &s.code {
                    out.push_str(" => ");
                    out.push_str(code);
                }
                out
            }
            MacroLine::Code(code) => format!("code {code}"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn build() -> Result<Parser> {
    let quote = char_literal("\"");

    let stmt_begin: Expr = Token::anonymous("//#").into();
    let code_begin: Expr = Token::anonymous("=>").into();
    let stmt_type: Expr = Token::new(STATEMENT_TYPE, char_word().one_or_more()).into();

    let quoted_value = Token::new(
        STATEMENT_ARG_VALUE,
        (char_literal("\\") & quote.clone() | char_set(!(quote.clone() + char_cr() + char_lf())))
            .one_or_more(),
    )
    .ws(WsPolicy::Disabled);
    let quoted_arg = Token::new(
        STATEMENT_ARG,
        quote.clone() & quoted_value & quote.clone().optional(),
    )
    .rule(
        Rule::<String>::new()
            .action(create(|v: &String| v.clone()).from(STATEMENT_ARG_VALUE)),
    );
    let unquoted_arg = Token::new(
        STATEMENT_ARG,
        !look_ahead(quote) & char_set(!char_space()).one_or_more(),
    );
    let stmt_arg = !look_ahead(code_begin.clone()) & (Expr::from(quoted_arg) | unquoted_arg);

    let stmt_code_value = Token::new(STATEMENT_CODE_VALUE, line());
    let stmt_code = Token::new(STATEMENT_CODE, code_begin & stmt_code_value).rule(
        Rule::<String>::new()
            .action(create(|v: &String| v.clone()).from(STATEMENT_CODE_VALUE)),
    );

    let statement = Token::new(
        STATEMENT,
        stmt_begin.clone()
            & stmt_type.clone()
            & stmt_arg.repeat()
            & Expr::from(stmt_code).optional(),
    )
    .ws(WsPolicy::Disabled)
    .rule(
        Rule::<Statement>::new()
            .action(
                update(|s: &mut Statement, keyword: &String| {
                    s.kind = StatementType::from_keyword(keyword)
                })
                .from(STATEMENT_TYPE),
            )
            .action(
                update(|s: &mut Statement, arg: &String| s.args.push(arg.clone()))
                    .from(STATEMENT_ARG),
            )
            .action(
                update(|s: &mut Statement, code: &String| s.code = Some(code.clone()))
                    .from(STATEMENT_CODE),
            ),
    );
    let stmt_line = start_of_line() & statement & skip_ws() & (line_break() | end_of_file());

    let code = Token::new(CODE, !look_ahead(stmt_begin & stmt_type) & line())
        .ws(WsPolicy::Disabled)
        .rule(Rule::<CodeLine>::new().action(capture(|text: &str| CodeLine(text.to_owned()))));
    let code_line = start_of_line() & code & (line_break() | end_of_file());

    let script = Token::new(MACRO, (stmt_line | code_line).repeat() & end_of_file())
        .ws(WsPolicy::Disabled)
        .rule(
            Rule::<MacroLines>::new()
                .action(
                    update(|m: &mut MacroLines, s: &Statement| {
                        m.push(MacroLine::Statement(s.clone()))
                    })
                    .from(STATEMENT),
                )
                .action(
                    update(|m: &mut MacroLines, l: &CodeLine| m.push(MacroLine::Code(l.0.clone())))
                        .from(CODE),
                ),
        );

    compile(&Expr::from(script), Some(&char_horiz_space().repeat()))
}
