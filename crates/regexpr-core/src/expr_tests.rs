use crate::{Direction, Expr, ExprKind, char_literal, choice, literal, look_ahead, look_behind, raw};

fn children(expr: &Expr) -> usize {
    match expr.kind() {
        ExprKind::Sequence(items) | ExprKind::Choice(items) => items.len(),
        other => panic!("not a list node: {other:?}"),
    }
}

#[test]
fn sequence_flattens_nested_sequences() {
    let expr = (literal("a") & "b") & (literal("c") & "d");

    assert!(matches!(expr.kind(), ExprKind::Sequence(_)));
    assert_eq!(children(&expr), 4);
}

#[test]
fn choice_flattens_but_keeps_sequences() {
    let expr = literal("a") | (literal("b") & "c") | "d";

    assert!(matches!(expr.kind(), ExprKind::Choice(_)));
    assert_eq!(children(&expr), 3);
}

#[test]
fn str_on_the_left() {
    let expr = "$(" & literal("x") & ")";
    assert_eq!(children(&expr), 3);
}

#[test]
fn literal_escapes_metacharacters() {
    let expr = literal("a.b*(c)");
    let ExprKind::Literal(lit) = expr.kind() else {
        panic!("expected literal");
    };
    assert_eq!(lit.pattern(), r"a\.b\*\(c\)");
    assert!(!lit.is_atomic());
}

#[test]
fn single_char_literal_is_atomic() {
    let expr = literal("+");
    let ExprKind::Literal(lit) = expr.kind() else {
        panic!("expected literal");
    };
    assert_eq!(lit.pattern(), r"\+");
    assert!(lit.is_atomic());
}

#[test]
fn raw_atomicity() {
    let atomic = |expr: Expr| match expr.kind() {
        ExprKind::Literal(lit) => lit.is_atomic(),
        _ => unreachable!(),
    };

    assert!(atomic(raw(".")));
    assert!(atomic(raw(r"\w")));
    assert!(!atomic(raw(r"\r?\n")));
    assert!(!atomic(raw("|")));
}

#[test]
fn char_literal_escapes_class_syntax() {
    let expr = char_literal("]-^");
    let ExprKind::CharLiteral(lit) = expr.kind() else {
        panic!("expected char literal");
    };
    assert_eq!(lit.chars(), r"\]\-\^");
}

#[test]
fn repeat_bounds() {
    let bounds = |expr: Expr| match expr.kind() {
        ExprKind::Repeat(rep) => (rep.at_least(), rep.at_most()),
        _ => unreachable!(),
    };

    assert_eq!(bounds(literal("a").repeat()), (0, None));
    assert_eq!(bounds(literal("a").optional()), (0, Some(1)));
    assert_eq!(bounds(literal("a").one_or_more()), (1, None));
    assert_eq!(bounds(literal("a").repeat_n(3)), (3, Some(3)));
    assert_eq!(bounds(literal("a").at_least(2)), (2, None));
    assert_eq!(bounds(literal("a").repeat_range(2, Some(5))), (2, Some(5)));
}

#[test]
fn not_toggles_assertions() {
    let assertion = |expr: &Expr| match expr.kind() {
        ExprKind::Assertion(a) => (a.direction(), a.is_negated()),
        _ => unreachable!(),
    };

    let ahead = look_ahead("x");
    assert_eq!(assertion(&ahead), (Direction::Ahead, false));
    assert_eq!(assertion(&!ahead.clone()), (Direction::Ahead, true));
    assert_eq!(assertion(&!!ahead), (Direction::Ahead, false));
}

#[test]
fn lookaround_keeps_negation_of_its_argument() {
    let expr = look_behind(!look_ahead("x"));

    let ExprKind::Assertion(a) = expr.kind() else {
        panic!("expected assertion");
    };
    assert_eq!(a.direction(), Direction::Behind);
    assert!(a.is_negated());
    assert!(matches!(a.child().kind(), ExprKind::Literal(_)));
}

#[test]
fn not_on_plain_expression_is_negative_lookahead() {
    let expr = !literal("abc");

    let ExprKind::Assertion(a) = expr.kind() else {
        panic!("expected assertion");
    };
    assert_eq!(a.direction(), Direction::Ahead);
    assert!(a.is_negated());
}

#[test]
fn not_on_class_inverts_the_class() {
    let expr = !char_literal("<");
    assert!(matches!(expr.kind(), ExprKind::CharSet(_)));
}

#[test]
fn clones_share_nodes() {
    let a = literal("a") & "b";
    let b = a.clone();
    let c = literal("a") & "b";

    assert!(a.ptr_eq(&b));
    assert!(!a.ptr_eq(&c));
    assert_eq!(children(&choice([a, b, c])), 3);
}
