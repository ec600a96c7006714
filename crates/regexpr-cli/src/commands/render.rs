use std::fmt::Write as _;

use regexpr_lib::{Colors, Pattern};

use super::require_grammar;

pub struct RenderArgs {
    pub grammar: String,
    pub json: bool,
    pub color: bool,
}

pub fn run(args: RenderArgs) {
    let grammar = require_grammar(&args.grammar);
    let parser = grammar.parser().unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(2);
    });

    if args.json {
        match serde_json::to_string_pretty(&parser.pattern().dump()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(2);
            }
        }
        return;
    }

    print!("{}", format_pattern(parser.pattern(), Colors::new(args.color)));
}

/// Pattern source followed by the capture and repeat tables.
pub fn format_pattern(pattern: &Pattern, colors: Colors) -> String {
    let c = &colors;
    let dump = pattern.dump();
    let mut out = String::new();

    writeln!(out, "{}", dump.pattern).expect("String write never fails");

    if !dump.captures.is_empty() {
        writeln!(out, "\n{}", c.paint(c.dim, "captures:")).expect("String write never fails");
        let width = dump.captures.iter().map(|cap| cap.id.len()).max().unwrap_or(0);
        for cap in &dump.captures {
            let id = format!("{:width$}", cap.id);
            writeln!(
                out,
                "  {} {} {}",
                c.paint(c.blue, &id),
                cap.token,
                c.paint(c.dim, &format!("in {}", cap.parent))
            )
            .expect("String write never fails");
        }
    }

    if !dump.repeats.is_empty() {
        writeln!(out, "\n{}", c.paint(c.dim, "repeats:")).expect("String write never fails");
        for rep in &dump.repeats {
            writeln!(
                out,
                "  {} [{}]",
                c.paint(c.blue, rep.id),
                rep.scope.captures.join(", ")
            )
            .expect("String write never fails");
        }
    }

    out
}
