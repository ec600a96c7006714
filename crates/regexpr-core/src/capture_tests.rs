use std::sync::Arc;

use crate::{Operand, OperatorCapture, ParseTree};

/// `1 + 2` folded under a root: NUM, OP, NUM.
fn tree() -> ParseTree<'static> {
    let mut tree = ParseTree::new("1 + 2");
    let root = tree.push(0, "", "0", 0..5, None);
    tree.push(1, "NUM", "t1_NUM", 0..1, Some(root));
    tree.push(2, "OP", "t2_OP", 2..3, Some(root));
    tree.push(1, "NUM", "t3_NUM", 4..5, Some(root));
    tree
}

#[test]
fn root_is_first_and_last() {
    let tree = tree();
    let root = tree.capture(0);

    assert!(root.is_first());
    assert!(root.is_last());
    assert!(root.parent().is_none());
    assert_eq!(root.children().count(), 3);
    assert_eq!(root.look_ahead(&[]).count(), 0);
}

#[test]
fn sibling_positions() {
    let tree = tree();

    assert!(tree.capture(1).is_first());
    assert!(!tree.capture(1).is_last());
    assert!(!tree.capture(2).is_first());
    assert!(tree.capture(3).is_last());
    assert_eq!(tree.capture(3).parent().map(|p| p.id()), Some(0));
}

#[test]
fn value_and_span() {
    let tree = tree();
    let op = tree.capture(2);

    assert_eq!(op.value(), "+");
    assert_eq!(op.span(), 2..3);
    assert_eq!(op.token_id(), "OP");
    assert_eq!(op.capture_id(), "t2_OP");
}

#[test]
fn look_ahead_filters_by_token_id() {
    let tree = tree();
    let first = tree.capture(1);

    let next = first.look_ahead(&[]).next().map(|c| c.token_id());
    assert_eq!(next, Some("OP"));

    let num = first.look_ahead(&["NUM"]).next().map(|c| c.span());
    assert_eq!(num, Some(4..5));

    assert!(tree.capture(3).look_ahead(&[]).next().is_none());
}

#[test]
fn look_behind_walks_backwards() {
    let tree = tree();
    let last = tree.capture(3);

    let spans: Vec<_> = last.look_behind(&[]).map(|c| c.span()).collect();
    assert_eq!(spans, vec![2..3, 0..1]);

    assert!(last.look_behind(&["EXPR"]).next().is_none());
    assert!(tree.capture(1).look_behind(&[]).next().is_none());
}

#[test]
fn is_and_is_not() {
    let tree = tree();
    let op = tree.capture(2);

    assert!(op.is(&["NUM", "OP"]));
    assert!(op.is_not(&["NUM"]));
    assert!(!op.is(&[]));
}

#[test]
fn operator_capture_reads_operand_stack() {
    let tree = tree();
    let operands = vec![
        Operand {
            node: 1,
            value: Arc::new(1_i32),
        },
        Operand {
            node: 3,
            value: Arc::new(2_i32),
        },
    ];
    let op = OperatorCapture::new(tree.capture(2), &operands);

    assert_eq!(op.token_id(), "OP");
    assert_eq!(op.left_operand().and_then(|o| o.production::<i32>()), Some(&1));
    assert_eq!(op.right_operand().and_then(|o| o.production::<i32>()), Some(&2));
    assert_eq!(op.operand().map(|o| o.span()), Some(4..5));
    assert!(op.operand().and_then(|o| o.production::<String>()).is_none());
}

#[test]
fn single_operand_has_no_left_or_right() {
    let tree = tree();
    let operands = vec![Operand {
        node: 1,
        value: Arc::new(1_i32),
    }];
    let op = OperatorCapture::new(tree.capture(2), &operands);

    assert!(op.has_operand());
    assert!(!op.has_left_operand());
    assert!(!op.has_right_operand());

    let empty = OperatorCapture::new(tree.capture(2), &[]);
    assert!(!empty.has_operand());
}
