//! `NAME:VALUE` property lines, as printed by `qmake -query` and similar
//! tools.

use std::sync::OnceLock;

use regexpr_core::action::{create, transform};
use regexpr_core::{Expr, Rule, Token, char_set};
use regexpr_vm::{Parser, Productions};

use crate::consts::{char_vert_space, start_of_line, vert_space};
use crate::{Result, compile};

pub const PROP: &str = "PROP";
pub const NAME: &str = "NAME";
pub const VALUE: &str = "VALUE";

pub const SAMPLE: &str = concat!(
    "QT_SYSROOT:\n",
    "QT_INSTALL_PREFIX:C:/Qt/6.5.0/msvc2019_64\n",
    "QT_VERSION:6.5.0\n",
);

pub type Property = (String, String);

static PARSER: OnceLock<Result<Parser>> = OnceLock::new();

pub fn parser() -> Result<&'static Parser> {
    PARSER.get_or_init(build).as_ref().map_err(Clone::clone)
}

/// Properties in input order. A property without a value maps to `""`.
pub fn parse(input: &str) -> Result<Vec<Property>> {
    let productions = parser()?.parse(input)?;
    Ok(properties(&productions))
}

fn properties(productions: &Productions<'_>) -> Vec<Property> {
    productions.values::<Property>(PROP).cloned().collect()
}

pub(super) fn show(productions: &Productions<'_>) -> String {
    properties(productions)
        .iter()
        .map(|(name, value)| format!("{name} = {value:?}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn build() -> Result<Parser> {
    let separator = Expr::from(':');
    let name_chars = char_set(!(separator.clone() + char_vert_space()));
    let value_chars = char_set(!char_vert_space());

    let name = Token::new(NAME, name_chars.one_or_more());
    let value = Token::new(VALUE, value_chars.repeat());
    let property = Token::new(PROP, Expr::from(name) & separator & value).rule(
        Rule::<Property>::new()
            .action(create(|name: &String| (name.clone(), String::new())).from(NAME))
            .action(
                transform(|(name, _): Property, value: &String| (name, value.clone()))
                    .from(VALUE),
            ),
    );

    let property_line = start_of_line() & property & vert_space();
    compile(&property_line.repeat(), None)
}
