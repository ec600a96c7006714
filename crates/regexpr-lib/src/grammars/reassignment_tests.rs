use regexpr_vm::ParseError;

use super::reassignment::{self, Reassignment, parse};
use super::find;
use crate::Error;

#[test]
fn reads_every_field() {
    let r = parse(reassignment::SAMPLE).unwrap();
    assert_eq!(
        r,
        Reassignment {
            name: "QtInstall".into(),
            value: "6.5.0".into(),
            old_value: "5.15.2".into(),
            location: r"C:\build\qt.props (12,5)".into(),
        }
    );
}

#[test]
fn empty_values() {
    let input = r#"Property reassignment: $(Defines)="" (previous value: "") at here"#;
    let r = parse(input).unwrap();

    assert_eq!(r.name, "Defines");
    assert!(r.value.is_empty());
    assert!(r.old_value.is_empty());
    assert_eq!(r.location, "here");
}

#[test]
fn other_messages_do_not_match() {
    let err = parse("Property set: $(A)=\"1\"").unwrap_err();
    assert_eq!(err, Error::Parse(ParseError::NoMatch));
}

#[test]
fn shown_like_a_build_log() {
    let grammar = find("reassignment").unwrap();
    insta::assert_snapshot!(grammar.run(reassignment::SAMPLE).unwrap(), @r#"
    [SET] QtInstall = "6.5.0"
        was: "5.15.2"
        at: C:\build\qt.props (12,5)
    "#);
}
