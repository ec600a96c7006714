use indoc::indoc;
use regexpr_compiler::{RenderError, render};
use regexpr_core::action::capture;
use regexpr_core::{Expr, Rule, Token, char_literal, char_range, char_set, literal, raw};

use super::{ParseError, Parser};

fn parser(expr: &Expr) -> Parser {
    Parser::new(render(expr, None).unwrap()).unwrap()
}

#[test]
fn name_and_quoted_value() {
    let name = Token::new("NAME", raw(r"\w+"));
    let value = Token::new("VALUE", char_set(!char_literal("\"")).repeat());
    let expr = Expr::from(name) & "=\"" & value & "\"";
    let parser = parser(&expr);

    let productions = parser.parse(r#"name="hello""#).unwrap();
    assert_eq!(productions.get_as::<String>("NAME").unwrap(), "name");
    assert_eq!(productions.get_as::<String>("VALUE").unwrap(), "hello");
}

#[test]
fn repeated_lines() {
    let line = Token::new("LINE", raw(r"[^\r\n]*"));
    let parser = parser(&(Expr::from(line) & "\n").repeat());

    let input = indoc! {"
        a
        b
        c
    "};
    let productions = parser.parse(input).unwrap();
    let lines: Vec<_> = productions.values::<String>("LINE").collect();
    assert_eq!(lines, vec!["a", "b", "c"]);
}

#[test]
fn n_occurrences_fold_to_n_values() {
    let item = Token::new("ITEM", char_range('0', '9').one_or_more())
        .rule(Rule::<u32>::new().action(capture(|text: &str| text.parse().unwrap_or_default())));
    let parser = parser(&(Expr::from(item) & literal(" ").optional()).repeat());

    let input = (0..50).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
    let productions = parser.parse(&input).unwrap();
    let values: Vec<u32> = productions.values::<u32>("ITEM").copied().collect();
    assert_eq!(values, (0..50).collect::<Vec<_>>());
    assert!(productions.get("ITEM").is_none());
}

#[test]
fn literal_round_trip() {
    for text in ["abc", "a.b*(c)", "[x]{2}", r"back\slash", "ünï"] {
        let parser = parser(&Token::new("LIT", literal(text)).into());
        let productions = parser.parse(text).unwrap();
        assert_eq!(productions.get_as::<String>("LIT").unwrap(), text);
    }
}

#[test]
fn exact_and_optional_quantifiers() {
    let exact = parser(&(raw(r"\A") & literal("ab").repeat_n(3) & raw(r"\z")));
    assert!(exact.parse("ababab").is_ok());
    assert_eq!(exact.parse("abab").unwrap_err(), ParseError::NoMatch);
    assert_eq!(exact.parse("abababab").unwrap_err(), ParseError::NoMatch);

    let optional = parser(&(raw(r"\A") & literal("ab").optional() & "c" & raw(r"\z")));
    assert!(optional.parse("c").is_ok());
    assert!(optional.parse("abc").is_ok());
    assert_eq!(optional.parse("ababc").unwrap_err(), ParseError::NoMatch);
}

#[test]
fn bounded_repeats_keep_their_count() {
    let a: Expr = Token::new("A", raw("a+")).into();
    let values = |expr: Expr, input: &str| -> Vec<String> {
        let parser = parser(&(raw(r"\A") & expr & raw(r"\z")));
        parser.parse(input).unwrap().values::<String>("A").cloned().collect()
    };

    assert_eq!(values(a.clone().repeat_n(2), "aaa"), vec!["aa", "a"]);
    assert_eq!(values(a.clone().at_least(3), "aaaa"), vec!["aa", "a", "a"]);
    assert_eq!(values(a.clone().repeat_range(2, Some(3)), "aaaaa"), vec!["aaaa", "a"]);
    assert_eq!(values(a.clone().repeat_range(1, Some(2)), "aaa"), vec!["aaa"]);
    assert_eq!(values(a.repeat(), "aaa"), vec!["aaa"]);
}

#[test]
fn multi_line_anchors() {
    let word = Token::new("WORD", raw(r"\w+"));
    let parser = parser(&(raw("^") & word & raw("$")));

    let productions = parser.parse("  \nfoo\n").unwrap();
    assert_eq!(productions.get_as::<String>("WORD").unwrap(), "foo");
}

#[test]
fn nested_repeat_fails_before_parsing() {
    let expr = literal("x").repeat().repeat();
    assert_eq!(render(&expr, None).unwrap_err(), RenderError::NestedRepeat);
}

#[test]
fn rejected_pattern_is_compile_error() {
    let err = Parser::new(render(&raw("(a"), None).unwrap()).unwrap_err();
    assert_eq!(err.pattern, "(?m)(a");
    assert!(!err.message.is_empty());
    assert!(err.to_string().starts_with("cannot compile pattern `(?m)(a`"));
}

#[test]
fn compiling_twice_parses_alike() {
    let num: Expr = Token::new("NUM", char_range('0', '9').one_or_more()).into();
    let expr = (num & literal(",").optional()).repeat();

    let a = parser(&expr);
    let b = parser(&expr);
    assert_eq!(a.pattern().source(), b.pattern().source());

    let input = "4,8,15,16";
    let a: Vec<String> = a.parse(input).unwrap().values::<String>("NUM").cloned().collect();
    let b: Vec<String> = b.parse(input).unwrap().values::<String>("NUM").cloned().collect();
    assert_eq!(a, b);
}

#[test]
fn builder_limits() {
    let pattern = render(&Token::new("A", "a").into(), None).unwrap();
    let parser = Parser::builder(pattern)
        .backtrack_limit(10)
        .delegate_size_limit(1 << 20)
        .build()
        .unwrap();

    assert_eq!(
        parser.parse("a").unwrap().get_as::<String>("A").unwrap(),
        "a"
    );
}

#[test]
fn parser_is_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Parser>();

    let num = Token::new("NUM", char_range('0', '9').one_or_more())
        .rule(Rule::<u64>::new().action(capture(|text: &str| text.parse().unwrap_or_default())));
    let parser = parser(&(Expr::from(num) & literal("+").optional()).repeat());

    std::thread::scope(|s| {
        let handles: Vec<_> = (1..=8u64)
            .map(|n| {
                let parser = &parser;
                s.spawn(move || {
                    let input = (1..=n).map(|i| i.to_string()).collect::<Vec<_>>().join("+");
                    let productions = parser.parse(&input).unwrap();
                    productions.values::<u64>("NUM").sum::<u64>()
                })
            })
            .collect();
        for (n, handle) in (1..=8u64).zip(handles) {
            assert_eq!(handle.join().unwrap(), n * (n + 1) / 2);
        }
    });
}

#[test]
fn char_set_difference_and_negation() {
    let accepts = |set: Expr, input: &str| {
        let token = Token::new("C", set);
        let parser = parser(&(raw(r"\A") & token & raw(r"\z")));
        match parser.parse(input) {
            Ok(_) => true,
            Err(ParseError::NoMatch) => false,
            Err(err) => panic!("unexpected error: {err:?}"),
        }
    };

    let consonant = || char_set(char_range('a', 'z') - char_literal("aeiou"));
    assert!(accepts(consonant(), "b"));
    assert!(accepts(consonant(), "z"));
    assert!(!accepts(consonant(), "a"));
    assert!(!accepts(consonant(), "u"));
    assert!(!accepts(consonant(), "1"));

    let outside = || !char_range('a', 'c');
    assert!(accepts(outside(), "d"));
    assert!(accepts(outside(), "x"));
    assert!(!accepts(outside(), "a"));
    assert!(!accepts(outside(), "b"));
    assert!(!accepts(outside(), "c"));
}
