//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so the same definition can be reused
//! by several commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Grammar name (positional, required).
pub fn grammar_arg() -> Arg {
    Arg::new("grammar")
        .value_name("GRAMMAR")
        .required(true)
        .help("Example grammar name (see `regexpr grammars`)")
}

/// Input file to parse (positional, `-` for stdin).
pub fn input_path_arg() -> Arg {
    Arg::new("input_path")
        .value_name("INPUT")
        .value_parser(value_parser!(PathBuf))
        .conflicts_with("input_text")
        .help("Input file to parse (`-` for stdin, grammar sample if omitted)")
}

/// Inline input text (-s/--source).
pub fn input_text_arg() -> Arg {
    Arg::new("input_text")
        .short('s')
        .long("source")
        .value_name("TEXT")
        .help("Inline input text")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Output the pattern dump as JSON (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output the pattern and capture table as JSON")
}

/// Trace verbosity (-v, -vv, -vvv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Trace the parse (-v), with scopes (-vv), with all text (-vvv)")
}

/// Backtracking limit of the regex engine (--backtrack-limit).
pub fn backtrack_limit_arg() -> Arg {
    Arg::new("backtrack_limit")
        .long("backtrack-limit")
        .value_name("N")
        .value_parser(value_parser!(usize))
        .help("Backtracking step limit of the regex engine")
}
