use crate::action::capture;
use crate::{ParseTree, Rule, Token, WsPolicy, literal};

fn tree() -> ParseTree<'static> {
    let mut tree = ParseTree::new("ab");
    let root = tree.push(0, "", "0", 0..2, None);
    tree.push(1, "X", "t1_X", 0..1, Some(root));
    tree.push(1, "X", "t2_X", 1..2, Some(root));
    tree
}

fn priority(token: &Token, tree: &ParseTree<'_>, node: usize) -> Option<i32> {
    token.select_rule(tree.capture(node)).map(|r| r.priority())
}

#[test]
fn new_token_defaults() {
    let token = Token::new("X", "x");

    assert_eq!(token.id(), "X");
    assert!(!token.is_anonymous());
    assert!(matches!(token.ws_policy(), WsPolicy::Default));
    assert!(token.expr().is_some());
    assert!(!token.has_rules());
}

#[test]
fn skip_ws_token_has_no_expression() {
    let token = Token::skip_ws();

    assert!(token.is_anonymous());
    assert!(token.expr().is_none());
}

#[test]
fn ws_policy_builders() {
    assert!(matches!(Token::new("X", "x").no_ws().ws_policy(), WsPolicy::Disabled));

    let custom = Token::anonymous("x").ws(WsPolicy::Custom(literal(" ")));
    assert!(matches!(custom.ws_policy(), WsPolicy::Custom(_)));
}

#[test]
fn no_rule_selects_nothing() {
    let tree = tree();
    let token = Token::new("X", "x");

    assert!(token.select_rule(tree.capture(1)).is_none());
}

#[test]
fn default_rule_is_last_resort() {
    let tree = tree();
    let token = Token::new("X", "x")
        .rule(Rule::<String>::new().priority(1))
        .rule(Rule::<String>::new().priority(2).select(|c| c.is_first()));

    assert_eq!(priority(&token, &tree, 1), Some(2));
    assert_eq!(priority(&token, &tree, 2), Some(1));
}

#[test]
fn first_registered_selector_wins() {
    let tree = tree();
    let token = Token::new("X", "x")
        .rule(Rule::<String>::new().priority(1).select(|c| c.is_last()))
        .rule(Rule::<String>::new().priority(2).select(|_| true));

    assert_eq!(priority(&token, &tree, 1), Some(2));
    assert_eq!(priority(&token, &tree, 2), Some(1));
}

#[test]
fn second_default_replaces_first() {
    let tree = tree();
    let token = Token::new("X", "x")
        .rule(Rule::<String>::new().priority(1))
        .rule(Rule::<String>::new().priority(2).action(capture(str::to_owned)));

    assert_eq!(priority(&token, &tree, 1), Some(2));
}
