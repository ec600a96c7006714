//! Integer expressions inside XML-like tags.
//!
//! `<a><x>2 + 3 * 4</x><y>(2 + 3) * 4</y></a>` reads back as
//! `a:{x=14,y=20}`. Tags are delimiters around their content, sibling tags
//! are joined by an infix rule, and the expressions inside a tag fold
//! through prefix, infix and parenthesis rules.

use std::sync::OnceLock;

use regexpr_core::action::{capture, create, create2, create2_if, error};
use regexpr_core::{
    Capture, Expr, OperatorCapture, Rule, Token, WsPolicy, char_literal, char_range, char_set,
    literal, look_ahead,
};
use regexpr_vm::{ParseError, Parser, Productions};

use crate::consts::{char_space, char_word, end_of_file, skip_ws, start_of_line};
use crate::{Result, compile};

pub const NUM: &str = "NUM";
pub const EXPR: &str = "EXPR";
pub const EXPR_LPAR: &str = "EXPR_LPAR";
pub const TAG_VALUE: &str = "TAG_VALUE";
pub const TAG_BEGIN: &str = "TAG_BEGIN";
pub const TAG_NAME: &str = "TAG_NAME";
pub const TAG: &str = "TAG";

const PRIORITY_INFIX_ADD: i32 = 10;
const PRIORITY_INFIX_MUL: i32 = 20;
const PRIORITY_PREFIX: i32 = 30;

pub const SAMPLE: &str = "<a><x>(-((2 + 3) * 4) / 5) * 3</x><y>(2 + 3) * 4</y></a>";

static PARSER: OnceLock<Result<Parser>> = OnceLock::new();

pub fn parser() -> Result<&'static Parser> {
    PARSER.get_or_init(build).as_ref().map_err(Clone::clone)
}

/// Parses `input` into the flattened `name=value` / `name:{...}` form.
pub fn parse(input: &str) -> Result<String> {
    let productions = parser()?.parse(input)?;
    Ok(result(&productions).ok_or(ParseError::NoMatch)?)
}

pub(super) fn show(productions: &Productions<'_>) -> String {
    result(productions).unwrap_or_default()
}

fn result(productions: &Productions<'_>) -> Option<String> {
    productions.get_as::<String>(TAG).cloned()
}

/// Prefix `+`/`-` only at the start of an expression or right after `(`,
/// and only in front of a number or `(`.
fn is_prefix(c: Capture<'_>) -> bool {
    let after_open = c
        .look_behind(&[])
        .next()
        .is_some_and(|prev| prev.is(&[EXPR_LPAR]));
    let before_operand = c
        .look_ahead(&[])
        .next()
        .is_some_and(|next| next.is(&[NUM, EXPR_LPAR]));
    (c.is_first() || after_open) && before_operand
}

fn arithmetic(symbol: char, rules: Vec<Rule<i64>>) -> Expr {
    let oper = char_literal("+-*/");
    let not_followed = !look_ahead(skip_ws() & (oper | char_literal(")<")));
    let mut token = Token::new(EXPR, Expr::from(symbol) & not_followed);
    for rule in rules {
        token.add_rule(rule);
    }
    token.into()
}

fn sign(symbol: char, apply: fn(i64) -> i64, infix: fn(i64, i64) -> i64) -> Expr {
    arithmetic(
        symbol,
        vec![
            Rule::prefix::<i64>(PRIORITY_PREFIX)
                .select(is_prefix)
                .action(create(move |x: &i64| apply(*x))),
            Rule::infix::<i64, i64>(PRIORITY_INFIX_ADD)
                .action(create2(move |x: &i64, y: &i64| infix(*x, *y))),
        ],
    )
}

fn divisor_is_not_zero(op: OperatorCapture<'_>) -> bool {
    op.right_operand()
        .and_then(|o| o.production::<i64>())
        .is_some_and(|y| *y != 0)
}

fn build() -> Result<Parser> {
    let digit = char_range('0', '9');

    let num = Token::new(
        NUM,
        digit.clone().one_or_more() & !look_ahead(skip_ws() & (digit.clone() | '(')),
    )
    .rule(Rule::<i64>::new().action(capture(|text: &str| text.parse().unwrap_or_default())));

    let plus = sign('+', |x| x, i64::wrapping_add);
    let minus = sign('-', i64::wrapping_neg, i64::wrapping_sub);
    let mul = arithmetic(
        '*',
        vec![
            Rule::infix::<i64, i64>(PRIORITY_INFIX_MUL)
                .action(create2(|x: &i64, y: &i64| x.wrapping_mul(*y))),
        ],
    );
    let div = arithmetic(
        '/',
        vec![
            Rule::infix::<i64, i64>(PRIORITY_INFIX_MUL)
                .pre(divisor_is_not_zero)
                .action(create2(|x: &i64, y: &i64| x.wrapping_div(*y))),
        ],
    );

    let lpar = Token::new(EXPR_LPAR, Expr::from('(') & !look_ahead(skip_ws() & char_literal(")<")))
        .rule(Rule::<String>::left_delimiter().action(capture(|text: &str| text.to_owned())));
    let rpar = Token::new(
        EXPR,
        Expr::from(')') & !look_ahead(skip_ws() & (digit | '(')),
    )
    .rule(Rule::<i64>::right_delimiter::<String, i64>().action(create2(|_: &String, n: &i64| *n)));

    let num_expr = (Expr::from(num) | plus | minus | mul | div | lpar | rpar).repeat();

    let tag_value = Token::new(
        TAG_VALUE,
        look_ahead(skip_ws() & char_set(!(char_space() + '<'))) & num_expr & look_ahead('<'),
    )
    .ws(WsPolicy::Disabled)
    .rule(
        Rule::<String>::new()
            .action(create(|n: &i64| format!("={n}")).from(NUM))
            .action(create(|n: &i64| format!("={n}")).from(EXPR)),
    );

    let tag_name = || Token::new(TAG_NAME, char_word().one_or_more());

    let tag_begin = Token::new(TAG_BEGIN, Expr::from('<') & tag_name() & '>').rule(
        Rule::<String>::left_delimiter()
            .action(create(|name: &String| name.clone()).from(TAG_NAME)),
    );

    let tag_end = Token::new(TAG, literal("</") & tag_name() & look_ahead('>')).rule(
        Rule::<String>::right_delimiter::<String, String>()
            .action(create(|name: &String| name.clone()).from(TAG_NAME))
            .action(error(
                |tag: &String, open: &String| tag != open,
                |tag: &String, open: &String| format!("expected `{open}`, found `{tag}`"),
            ))
            .action(create2_if(
                |_: &String, value: &String| value.starts_with('='),
                |tag: &String, value: &String| format!("{tag}{value}"),
            ))
            .action(create2_if(
                |_: &String, value: &String| !value.starts_with('='),
                |tag: &String, value: &String| format!("{tag}:{{{value}}}"),
            )),
    );

    let tag_concat = Token::new(
        TAG,
        Expr::from('>') & look_ahead(skip_ws() & '<' & !char_literal("/")),
    )
    .rule(
        Rule::<String>::infix::<String, String>(0)
            .pre(|op: OperatorCapture<'_>| {
                op.left_operand().is_some_and(|o| o.is(&[TAG]))
                    && op.right_operand().is_some_and(|o| o.is(&[TAG]))
            })
            .action(create2(|l: &String, r: &String| format!("{l},{r}"))),
    );

    let xml_int = start_of_line()
        & (Expr::from(tag_begin) | tag_value | Expr::from(tag_end) & (Expr::from(tag_concat) | '>'))
            .repeat()
        & skip_ws()
        & end_of_file();

    compile(&xml_int, Some(&char_space().repeat()))
}
