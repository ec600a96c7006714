//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("regexpr")
        .about("Composable regex patterns with production rules")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(grammars_command())
        .subcommand(render_command())
        .subcommand(parse_command())
}

/// List the example grammars.
pub fn grammars_command() -> Command {
    Command::new("grammars").about("List the example grammars")
}

/// Show the rendered pattern of a grammar.
pub fn render_command() -> Command {
    Command::new("render")
        .about("Show the rendered pattern and capture table of a grammar")
        .override_usage(
            "\
  regexpr render <GRAMMAR>
  regexpr render <GRAMMAR> --json",
        )
        .after_help(
            r#"EXAMPLES:
  regexpr render xml-int            # pattern and capture table
  regexpr render xml-int --json     # same, as JSON"#,
        )
        .arg(grammar_arg())
        .arg(json_arg())
        .arg(color_arg())
}

/// Parse input with a grammar and print the productions.
pub fn parse_command() -> Command {
    Command::new("parse")
        .about("Parse input with a grammar and print the productions")
        .override_usage(
            "\
  regexpr parse <GRAMMAR> [INPUT]
  regexpr parse <GRAMMAR> -s <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  regexpr parse xml-int                        # parse the grammar sample
  regexpr parse xml-int input.xml              # parse a file
  regexpr parse xml-int -s '<x>1+2</x>'        # inline input
  cat build.log | regexpr parse reassignment - # stdin
  regexpr parse xml-int -s '<x>1</x>' -vv      # trace scopes and iterations

EXIT STATUS:
  0 on success, 1 when the input does not match, 2 on any other error."#,
        )
        .arg(grammar_arg())
        .arg(input_path_arg())
        .arg(input_text_arg())
        .arg(verbose_arg())
        .arg(backtrack_limit_arg())
        .arg(color_arg())
}
