use regexpr_compiler::render;
use regexpr_core::action::{capture, create, create2, error, update};
use regexpr_core::{Capture, Expr, OperatorCapture, Rule, Token, char_range, literal, raw};

use super::{ParseError, Parser};

// ============================================================================
// Calculator
// ============================================================================

const OPERATORS: [&str; 4] = ["ADD", "MUL", "MINUS", "OPEN"];

fn calculator() -> Parser {
    let num = Token::new("NUM", char_range('0', '9').one_or_more()).rule(
        Rule::<i64>::new().action(capture(|text: &str| text.parse().unwrap_or_default())),
    );
    let word = Token::new("WORD", char_range('a', 'z').one_or_more());
    let add = Token::new("ADD", literal("+"))
        .rule(Rule::<i64>::infix::<i64, i64>(10).action(create2(|l: &i64, r: &i64| l + r)));
    let mul = Token::new("MUL", literal("*"))
        .rule(Rule::<i64>::infix::<i64, i64>(20).action(create2(|l: &i64, r: &i64| l * r)));
    let minus = Token::new("MINUS", literal("-"))
        .rule(
            Rule::<i64>::prefix::<i64>(30)
                .select(|c: Capture<'_>| {
                    c.look_behind(&[])
                        .next()
                        .is_none_or(|prev| prev.is(&OPERATORS))
                })
                .action(create(|v: &i64| -v)),
        )
        .rule(Rule::<i64>::infix::<i64, i64>(10).action(create2(|l: &i64, r: &i64| l - r)));
    let fact = Token::new("FACT", literal("!")).rule(
        Rule::<i64>::postfix::<i64>(40)
            .pre(|op: OperatorCapture<'_>| {
                op.operand()
                    .and_then(|o| o.production::<i64>())
                    .is_some_and(|v| *v >= 0)
            })
            .action(create(|v: &i64| (1..=*v).product())),
    );
    let open = Token::new("OPEN", literal("(")).rule(Rule::<()>::left_delimiter());
    let close = Token::new("CLOSE", literal(")"))
        .rule(Rule::<i64>::right_delimiter::<(), i64>().action(create2(|_: &(), e: &i64| *e)));

    let expr = (Expr::from(num) | word | add | mul | minus | fact | open | close).one_or_more();
    Parser::new(render(&expr, Some(&raw(r"\s*"))).unwrap()).unwrap()
}

fn eval(parser: &Parser, input: &str) -> Result<i64, ParseError> {
    let productions = parser.parse(input)?;
    let top: Vec<_> = productions
        .items()
        .iter()
        .filter(|p| p.top_level)
        .collect();
    assert_eq!(top.len(), 1, "{input}");
    Ok(*top[0].value.downcast_ref::<i64>().unwrap())
}

#[test]
fn operators_fold_by_priority() {
    let parser = calculator();

    assert_eq!(eval(&parser, "1 + 2 * 3"), Ok(7));
    assert_eq!(eval(&parser, "1 * 2 + 3"), Ok(5));
    assert_eq!(eval(&parser, "2 * (1 + 3)"), Ok(8));
    assert_eq!(eval(&parser, "((4))"), Ok(4));
}

#[test]
fn selector_picks_prefix_after_operator() {
    let parser = calculator();

    assert_eq!(eval(&parser, "1 - -2"), Ok(3));
    assert_eq!(eval(&parser, "-2 * 3"), Ok(-6));
    assert_eq!(eval(&parser, "5 - 2"), Ok(3));
}

#[test]
fn postfix_binds_tighter_than_prefix() {
    let parser = calculator();

    assert_eq!(eval(&parser, "3! + 1"), Ok(7));
    assert_eq!(eval(&parser, "-3!"), Ok(-6));
}

#[test]
fn dangling_infix_is_missing_operand() {
    let err = calculator().parse("1 +").unwrap_err();
    assert_eq!(
        err,
        ParseError::Rule {
            token: "ADD".into(),
            span: 2..3,
            message: "missing operand".into(),
        }
    );
}

#[test]
fn double_prefix_is_missing_operand() {
    let err = calculator().parse("- - 1").unwrap_err();
    assert_eq!(
        err,
        ParseError::Rule {
            token: "MINUS".into(),
            span: 0..1,
            message: "missing operand".into(),
        }
    );
}

#[test]
fn failed_precondition() {
    let err = calculator().parse("(-3)!").unwrap_err();
    assert_eq!(
        err,
        ParseError::Rule {
            token: "FACT".into(),
            span: 4..5,
            message: "precondition not met".into(),
        }
    );
}

#[test]
fn mistyped_operand() {
    let err = calculator().parse("1 + x").unwrap_err();
    assert_eq!(
        err,
        ParseError::Rule {
            token: "ADD".into(),
            span: 2..3,
            message: "operand 1 has an unexpected type".into(),
        }
    );
}

#[test]
fn unbalanced_delimiters() {
    let parser = calculator();

    let unbalanced = |token: &str, span| ParseError::Unbalanced {
        token: token.into(),
        span,
    };
    assert_eq!(parser.parse("(1").unwrap_err(), unbalanced("OPEN", 0..1));
    assert_eq!(parser.parse("1)").unwrap_err(), unbalanced("CLOSE", 1..2));
    assert_eq!(parser.parse("()").unwrap_err(), unbalanced("CLOSE", 1..2));
}

// ============================================================================
// Child productions
// ============================================================================

fn lists(item_rule: Rule<Vec<String>>) -> Parser {
    let item: Expr = Token::new("ITEM", char_range('a', 'z')).into();
    let list: Expr = Token::new("LIST", literal("[") & item.repeat() & "]")
        .rule(item_rule)
        .into();
    Parser::new(render(&list.repeat(), None).unwrap()).unwrap()
}

#[test]
fn child_bound_actions_run_per_child() {
    let rule = Rule::new().action(
        update(|list: &mut Vec<String>, item: &String| list.push(item.clone())).from("ITEM"),
    );
    let parser = lists(rule);
    let productions = parser.parse("[ab][][c]").unwrap();

    let lists: Vec<_> = productions.values::<Vec<String>>("LIST").collect();
    assert_eq!(lists, vec![&vec!["a", "b"], &vec![], &vec!["c"]]);

    let items: Vec<_> = productions.values::<String>("ITEM").collect();
    assert_eq!(items, vec!["a", "b", "c"]);
}

#[test]
fn error_action_reports_the_occurrence() {
    let rule = Rule::new()
        .action(
            update(|list: &mut Vec<String>, item: &String| list.push(item.clone())).from("ITEM"),
        )
        .action(
            error(
                |_: &Vec<String>, item: &String| item == "x",
                |_: &Vec<String>, item: &String| format!("`{item}` is reserved"),
            )
            .from("ITEM"),
        );
    let err = lists(rule).parse("[a][bxc]").unwrap_err();

    assert_eq!(
        err,
        ParseError::Rule {
            token: "LIST".into(),
            span: 3..8,
            message: "`x` is reserved".into(),
        }
    );
}
