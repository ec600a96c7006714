use regexpr_core::{
    CharSetExpr, Expr, Token, WsPolicy, char_literal, char_range, char_raw, char_set, literal,
    look_ahead, look_behind, raw,
};

use super::{RenderError, RenderOptions, render};

fn source(expr: &Expr) -> String {
    render(expr, None).unwrap().source().to_owned()
}

fn source_ws(expr: &Expr) -> String {
    render(expr, Some(&raw(r"\s*"))).unwrap().source().to_owned()
}

fn lines(exprs: &[Expr]) -> String {
    exprs.iter().map(source).collect::<Vec<_>>().join("\n")
}

#[test]
fn quantifier_spellings() {
    let a = || literal("a");
    let res = lines(&[
        a().optional(),
        a().repeat(),
        a().one_or_more(),
        a().repeat_n(3),
        a().at_least(2),
        a().repeat_range(0, Some(4)),
        a().repeat_range(2, Some(5)),
        a().repeat_range(1, Some(1)),
    ]);

    insta::assert_snapshot!(res, @r"
    a?
    a*
    a+
    a{3}
    a{2,}
    a{0,4}
    a{2,5}
    a{1}
    ");
}

#[test]
fn repeat_groups_multi_atom_children() {
    let res = lines(&[
        literal("ab").repeat(),
        (literal("a") & "b").optional(),
        raw(r"\w").one_or_more(),
        (literal("a") | "b").repeat(),
        look_ahead("a").optional(),
    ]);

    insta::assert_snapshot!(res, @r"
    (?:ab)*
    (?:ab)?
    \w+
    (?:a|b)*
    (?:(?=a))?
    ");
}

#[test]
fn sequence_and_choice() {
    let expr = literal("a") & (literal("b") | "c" | "d.e") & "f";
    insta::assert_snapshot!(source(&expr), @r"a(?:b|c|d\.e)f");
}

#[test]
fn char_classes() {
    let res = lines(&[
        char_literal("<"),
        char_range('a', 'z'),
        char_set(char_range('a', 'z') + char_literal("_")),
        char_set(!char_literal("<")),
        !char_literal("<"),
        char_set(char_raw(r"\w") - char_literal("_")),
        char_set(!(char_raw(r"\S") + char_raw(r"\r\n"))),
        char_set(!(char_range('0', '9') - char_literal("5"))),
    ]);

    insta::assert_snapshot!(res, @r"
    [<]
    [a-z]
    [a-z_]
    [^<]
    [^<]
    [\w&&[^_]]
    [^\S\r\n]
    [5&&[^0-9]]
    ");
}

#[test]
fn unresolved_char_set_fails() {
    let err = render(&char_set(CharSetExpr::Union(Vec::new())), None).unwrap_err();
    assert_eq!(err, RenderError::CharClassEval);

    let err = render(&char_set(literal("ab") - literal("c")), None).unwrap_err();
    assert_eq!(err, RenderError::CharClassEval);
}

#[test]
fn assertions() {
    let res = lines(&[
        look_ahead("a"),
        !look_ahead("a"),
        look_behind("a"),
        !look_behind("a"),
        !literal("a"),
    ]);

    insta::assert_snapshot!(res, @r"
    (?=a)
    (?!a)
    (?<=a)
    (?<!a)
    (?!a)
    ");
}

#[test]
fn nested_assertion_fails() {
    let expr = look_ahead(literal("a") & look_behind("b"));
    assert_eq!(render(&expr, None).unwrap_err(), RenderError::NestedAssert);
}

#[test]
fn nested_repeat_fails() {
    let expr = literal("a").repeat().repeat();
    assert_eq!(render(&expr, None).unwrap_err(), RenderError::NestedRepeat);

    // A sequence in between is fine.
    let expr = (literal("a").repeat() & "b").repeat();
    assert_eq!(source(&expr), "(?:a*b)*");
}

#[test]
fn token_capture_groups() {
    let num = || Token::new("NUM", char_range('0', '9').one_or_more());

    let res = [
        source(&num().into()),
        source_ws(&num().into()),
        source_ws(&num().no_ws().into()),
        source_ws(&num().ws(WsPolicy::Custom(char_literal(" ").repeat())).into()),
        source_ws(&Token::anonymous("a").into()),
        source_ws(&Token::skip_ws().into()),
    ]
    .join("\n");

    insta::assert_snapshot!(res, @r"
    (?<t1_NUM>[0-9]+)
    (?:(?:\s*)(?<t1_NUM>[0-9]+))
    (?<t1_NUM>[0-9]+)
    (?:[ ]*(?<t1_NUM>[0-9]+))
    (?:(?:\s*)(?:a))
    (?:(?:\s*))
    ");

    assert_eq!(source(&Token::skip_ws().into()), "");
}

#[test]
fn tokens_inside_assertions_do_not_capture() {
    let expr = look_ahead(Token::new("A", "a"));
    insta::assert_snapshot!(source_ws(&expr), @r"(?=(?:\s*(?:a)))");
}

#[test]
fn shared_token_gets_distinct_captures() {
    let a: Expr = Token::new("A", "a").into();
    let pattern = render(&(a.clone() & "-" & a), None).unwrap();

    assert_eq!(pattern.source(), r"(?<t1_A>a)\-(?<t2_A>a)");
    assert_eq!(pattern.captures().len(), 2);
    assert_eq!(pattern.capture("t1_A").map(|s| s.token), Some(1));
    assert_eq!(pattern.capture("t2_A").map(|s| s.token), Some(1));
    assert_eq!(pattern.tokens().len(), 2);
}

#[test]
fn nested_tokens_record_parents() {
    let inner = Token::new("INNER", "x");
    let outer = Token::new("OUTER", inner);
    let pattern = render(&outer.into(), None).unwrap();

    assert_eq!(pattern.source(), "(?<t1_OUTER>(?<t2_INNER>x))");

    let inner = pattern.capture("t2_INNER").unwrap();
    assert_eq!(inner.parent_capture, "t1_OUTER");
    assert_eq!(inner.parent_token, 1);
    assert_eq!(inner.depth, 2);

    let outer = pattern.capture("t1_OUTER").unwrap();
    assert_eq!(outer.parent_capture, "0");
    assert_eq!(outer.parent_token, 0);
    assert_eq!(pattern.children(0).collect::<Vec<_>>(), vec![1]);
    assert_eq!(pattern.children(1).collect::<Vec<_>>(), vec![2]);
}

#[test]
fn repeat_with_capture_gets_a_group() {
    let x: Expr = Token::new("X", "x").into();
    let pattern = render(&x.repeat(), None).unwrap();

    assert_eq!(pattern.source(), "(?<r1>(?<t2_X>x)*)");
    assert_eq!(pattern.repeats().len(), 1);
    assert_eq!(pattern.repeats()[0].body, "(?<t2_X>x)");
    assert_eq!(pattern.repeats()[0].scope.captures, vec![0]);
    assert!(pattern.root_scope().captures.is_empty());
    assert_eq!(pattern.root_scope().repeats, vec![0]);
}

#[test]
fn repeat_inside_assertion_gets_no_group() {
    let x: Expr = Token::new("X", "x").into();
    let pattern = render(&look_ahead(x.repeat()), None).unwrap();

    assert_eq!(pattern.source(), "(?=(?:x)*)");
    assert!(pattern.repeats().is_empty());
}

#[test]
fn default_ws_tokens_do_not_recurse() {
    let ws: Expr = Token::skip_ws().into();
    let options = RenderOptions::new().default_ws(ws & raw(" *"));
    let pattern = options.render(&Token::new("A", "a").into()).unwrap();

    assert_eq!(pattern.source(), "(?:(?: *)(?<t1_A>a))");
}

#[test]
fn invalid_prefix_fails() {
    let options = RenderOptions::new().capture_prefix("1x");
    let err = options.render(&Token::new("A", "a").into()).unwrap_err();
    assert_eq!(err, RenderError::InvalidCaptureId("1x1_A".into()));
}

#[test]
fn rendering_is_deterministic() {
    let num: Expr = Token::new("NUM", char_range('0', '9').one_or_more()).into();
    let expr = (num.clone() & (literal("+") & num).repeat()) | "x";

    let a = render(&expr, Some(&raw(r"\s*"))).unwrap();
    let b = render(&expr, Some(&raw(r"\s*"))).unwrap();
    assert_eq!(a.source(), b.source());
}

#[test]
fn deep_trees_render_iteratively() {
    let mut expr = literal("a");
    for _ in 0..2_000 {
        expr = literal("b") & (expr | "c");
    }
    let out = source(&expr);
    assert_eq!(out.matches("(?:").count(), 2_000);
}
