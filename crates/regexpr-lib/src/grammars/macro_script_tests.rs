use indoc::indoc;

use super::macro_script::{self, MacroLine, Statement, StatementType, parse};

fn statement(kind: StatementType, args: &[&str], code: Option<&str>) -> MacroLine {
    MacroLine::Statement(Statement {
        kind,
        args: args.iter().map(|a| a.to_string()).collect(),
        code: code.map(str::to_owned),
    })
}

#[test]
fn statements_and_code_lines() {
    let lines = parse(macro_script::SAMPLE).unwrap();
    let lines: Vec<_> = lines.iter().cloned().collect();

    assert_eq!(
        lines,
        vec![
            statement(StatementType::Thread, &["ui"], None),
            statement(
                StatementType::Reference,
                &["System.Windows", "System.Windows.Forms"],
                None
            ),
            MacroLine::Code("var window = GetWindow();".into()),
            statement(StatementType::Wait, &["5000"], Some("window.IsVisible")),
            statement(StatementType::Quit, &[], None),
        ]
    );
}

#[test]
fn code_after_arrow_keeps_the_rest_of_the_line() {
    let input = indoc! {r#"
        //# ui context VS => "Solution Explorer", "MyProject"
        //# var int count => 0
    "#};
    let lines = parse(input).unwrap();
    let statements: Vec<_> = lines.statements().cloned().collect();

    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0].kind, StatementType::Ui);
    assert_eq!(statements[0].args, vec!["context", "VS"]);
    assert_eq!(
        statements[0].code.as_deref(),
        Some(r#""Solution Explorer", "MyProject""#)
    );
    assert_eq!(statements[1].kind, StatementType::Var);
    assert_eq!(statements[1].args, vec!["int", "count"]);
    assert_eq!(statements[1].code.as_deref(), Some("0"));
}

#[test]
fn quoted_arguments_keep_escaped_quotes() {
    let lines = parse(r#"//# call "say \"hi\"" next"#).unwrap();
    let statement = lines.statements().next().unwrap();

    assert_eq!(statement.kind, StatementType::Call);
    assert_eq!(statement.args, vec![r#"say \"hi\""#, "next"]);
}

#[test]
fn keywords_ignore_case() {
    assert_eq!(StatementType::from_keyword("REF"), StatementType::Reference);
    assert_eq!(StatementType::from_keyword("Using"), StatementType::Using);
    assert_eq!(StatementType::from_keyword("nope"), StatementType::Unknown);

    let lines = parse("//# Frobnicate now").unwrap();
    let statement = lines.statements().next().unwrap();
    assert_eq!(statement.kind, StatementType::Unknown);
    assert_eq!(statement.args, vec!["now"]);
}

#[test]
fn blank_lines_are_skipped() {
    let input = "a = 1;\n\n  \n//# quit\n";
    let lines = parse(input).unwrap();

    let rendered: Vec<_> = (&lines).into_iter().cloned().collect();
    assert_eq!(
        rendered,
        vec![
            MacroLine::Code("a = 1;".into()),
            MacroLine::Code("  ".into()),
            statement(StatementType::Quit, &[], None),
        ]
    );
    assert_eq!(lines.len(), 3);
    assert!(!lines.is_empty());
}

#[test]
fn statement_marker_without_type_is_code() {
    let lines = parse("//#\n").unwrap();
    assert_eq!(lines.iter().next(), Some(&MacroLine::Code("//#".into())));
}
