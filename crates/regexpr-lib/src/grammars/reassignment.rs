//! Build-log property reassignment messages.
//!
//! `Property reassignment: $(NAME)="VALUE" (previous value: "OLD") at LOCATION`

use std::sync::OnceLock;

use regexpr_core::action::update;
use regexpr_core::{Expr, Rule, Token, char_literal, char_set};
use regexpr_vm::{ParseError, Parser, Productions};

use crate::consts::{any_char, end_of_file, start_of_file, word};
use crate::{Result, compile};

pub const REASSIGNMENT: &str = "REASSIGNMENT";
pub const NAME: &str = "NAME";
pub const VALUE: &str = "VALUE";
pub const OLD_VALUE: &str = "OLDVALUE";
pub const LOCATION: &str = "LOCATION";

pub const SAMPLE: &str = concat!(
    r#"Property reassignment: $(QtInstall)="6.5.0" "#,
    r#"(previous value: "5.15.2") at C:\build\qt.props (12,5)"#,
);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reassignment {
    pub name: String,
    pub value: String,
    pub old_value: String,
    pub location: String,
}

static PARSER: OnceLock<Result<Parser>> = OnceLock::new();

pub fn parser() -> Result<&'static Parser> {
    PARSER.get_or_init(build).as_ref().map_err(Clone::clone)
}

pub fn parse(input: &str) -> Result<Reassignment> {
    let productions = parser()?.parse(input)?;
    Ok(productions
        .get_as::<Reassignment>(REASSIGNMENT)
        .cloned()
        .ok_or(ParseError::NoMatch)?)
}

pub(super) fn show(productions: &Productions<'_>) -> String {
    let Some(r) = productions.get_as::<Reassignment>(REASSIGNMENT) else {
        return String::new();
    };
    format!(
        "[SET] {} = \"{}\"\n    was: \"{}\"\n    at: {}",
        r.name, r.value, r.old_value, r.location
    )
}

fn build() -> Result<Parser> {
    let quoted = |id: &str| {
        Expr::from('"') & Token::new(id, char_set(!char_literal("\"")).repeat()) & '"'
    };

    let name = "$(" & Expr::from(Token::new(NAME, word())) & ")";
    let location = Token::new(LOCATION, any_char().repeat());

    let reassignment = Token::new(
        REASSIGNMENT,
        start_of_file()
            & "Property reassignment: "
            & name
            & "="
            & quoted(VALUE)
            & " (previous value: "
            & quoted(OLD_VALUE)
            & ") at "
            & location
            & end_of_file(),
    )
    .rule(
        Rule::<Reassignment>::new()
            .action(update(|r: &mut Reassignment, s: &String| r.name = s.clone()).from(NAME))
            .action(update(|r: &mut Reassignment, s: &String| r.value = s.clone()).from(VALUE))
            .action(
                update(|r: &mut Reassignment, s: &String| r.old_value = s.clone()).from(OLD_VALUE),
            )
            .action(
                update(|r: &mut Reassignment, s: &String| r.location = s.clone()).from(LOCATION),
            ),
    );

    compile(&Expr::from(reassignment), None)
}
