//! Parse input with an example grammar.

use std::path::PathBuf;

use regexpr_lib::{Colors, Error, ParseError, Parser, PrintTracer, Result, Verbosity};

use super::input::load_input;
use super::require_grammar;

pub struct ParseArgs {
    pub grammar: String,
    pub input_path: Option<PathBuf>,
    pub input_text: Option<String>,
    /// `None` parses without tracing.
    pub verbosity: Option<Verbosity>,
    pub backtrack_limit: Option<usize>,
    pub color: bool,
}

pub fn run(args: ParseArgs) {
    let grammar = require_grammar(&args.grammar);
    let input = load_input(
        args.input_text.as_deref(),
        args.input_path.as_deref(),
        grammar.sample,
    )
    .unwrap_or_else(|e| {
        eprintln!("error: failed to read input: {}", e);
        std::process::exit(2);
    });

    let base = grammar.parser().unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(2);
    });
    let limited;
    let parser = match args.backtrack_limit {
        Some(limit) => {
            limited = with_backtrack_limit(base, limit).unwrap_or_else(|e| {
                eprintln!("error: {}", e);
                std::process::exit(2);
            });
            &limited
        }
        None => base,
    };

    let colors = Colors::new(args.color);
    let result = match args.verbosity {
        Some(verbosity) => {
            let mut tracer = PrintTracer::new(verbosity, colors);
            let result = parser.parse_with(input.text(), &mut tracer);
            tracer.print();
            if result.is_ok() {
                println!("{}", colors.paint(colors.dim, "---"));
            }
            result
        }
        None => parser.parse(input.text()),
    };

    match result {
        Ok(productions) => println!("{}", grammar.show(&productions)),
        Err(e) => {
            let err = Error::from(e);
            let mut printer = err.printer().source(input.text()).colored(args.color);
            if let Some(path) = input.path() {
                printer = printer.path(path);
            }
            eprintln!("{}", printer.render());
            std::process::exit(exit_code(&err));
        }
    }
}

/// Rebuilds `parser` from its pattern with a backtracking limit.
pub fn with_backtrack_limit(parser: &Parser, limit: usize) -> Result<Parser> {
    Ok(Parser::builder(parser.pattern().clone())
        .backtrack_limit(limit)
        .build()?)
}

/// 1 when the input simply does not match, 2 for everything else.
pub fn exit_code(err: &Error) -> i32 {
    match err {
        Error::Parse(ParseError::NoMatch) => 1,
        _ => 2,
    }
}
