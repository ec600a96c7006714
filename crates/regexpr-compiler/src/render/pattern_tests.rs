use regexpr_core::{Expr, Token};

use super::render;

fn list_pattern() -> super::Pattern {
    let item: Expr = Token::new("ITEM", "x").into();
    let list = Token::new("LIST", item.repeat());
    render(&list.into(), None).unwrap()
}

#[test]
fn dump_lists_captures_and_scopes() {
    let pattern = list_pattern();
    let json = serde_json::to_string_pretty(&pattern.dump()).unwrap();

    insta::assert_snapshot!(json, @r#"
    {
      "pattern": "(?<t1_LIST>(?<r2>(?<t3_ITEM>x)*))",
      "captures": [
        {
          "id": "t1_LIST",
          "token": "LIST",
          "parent": "0",
          "depth": 1
        },
        {
          "id": "t3_ITEM",
          "token": "ITEM",
          "parent": "t1_LIST",
          "depth": 2
        }
      ],
      "repeats": [
        {
          "id": "r2",
          "body": "(?<t3_ITEM>x)",
          "captures": [
            "t3_ITEM"
          ],
          "repeats": []
        }
      ],
      "root": {
        "captures": [
          "t1_LIST"
        ],
        "repeats": [
          "r2"
        ]
      }
    }
    "#);
}

#[test]
fn tokens_are_indexed_by_first_appearance() {
    let pattern = list_pattern();
    let ids: Vec<_> = pattern.tokens().iter().map(|t| t.id()).collect();

    assert_eq!(ids, vec!["", "LIST", "ITEM"]);
    assert_eq!(pattern.children(1).collect::<Vec<_>>(), vec![2]);
    assert_eq!(pattern.children(2).count(), 0);
}

#[test]
fn pattern_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<super::Pattern>();
}
