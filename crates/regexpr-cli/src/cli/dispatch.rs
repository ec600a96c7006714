//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;
use regexpr_lib::Verbosity;

use super::ColorChoice;
use crate::commands::parse::ParseArgs;
use crate::commands::render::RenderArgs;

pub struct GrammarsParams;

impl GrammarsParams {
    pub fn from_matches(_m: &ArgMatches) -> Self {
        Self
    }
}

pub struct RenderParams {
    pub grammar: String,
    pub json: bool,
    pub color: ColorChoice,
}

impl RenderParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar: m.get_one::<String>("grammar").cloned().unwrap_or_default(),
            json: m.get_flag("json"),
            color: parse_color(m),
        }
    }
}

impl From<RenderParams> for RenderArgs {
    fn from(p: RenderParams) -> Self {
        Self {
            grammar: p.grammar,
            json: p.json,
            color: p.color.should_colorize(),
        }
    }
}

pub struct ParseParams {
    pub grammar: String,
    pub input_path: Option<PathBuf>,
    pub input_text: Option<String>,
    pub verbose: u8,
    pub backtrack_limit: Option<usize>,
    pub color: ColorChoice,
}

impl ParseParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar: m.get_one::<String>("grammar").cloned().unwrap_or_default(),

            // Input
            input_path: m.get_one::<PathBuf>("input_path").cloned(),
            input_text: m.get_one::<String>("input_text").cloned(),

            // Engine and trace options
            verbose: m.get_count("verbose"),
            backtrack_limit: m.get_one::<usize>("backtrack_limit").copied(),
            color: parse_color(m),
        }
    }
}

impl From<ParseParams> for ParseArgs {
    fn from(p: ParseParams) -> Self {
        Self {
            grammar: p.grammar,
            input_path: p.input_path,
            input_text: p.input_text,
            verbosity: verbosity(p.verbose),
            backtrack_limit: p.backtrack_limit,
            color: p.color.should_colorize(),
        }
    }
}

/// No tracing without `-v`; each further `-v` raises the trace verbosity.
fn verbosity(count: u8) -> Option<Verbosity> {
    match count {
        0 => None,
        1 => Some(Verbosity::Default),
        2 => Some(Verbosity::Verbose),
        _ => Some(Verbosity::VeryVerbose),
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(String::as_str) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
