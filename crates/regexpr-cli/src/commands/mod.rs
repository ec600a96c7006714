pub mod grammars;
pub mod input;
pub mod parse;
pub mod render;


use regexpr_lib::grammars::{Grammar, find};

/// Resolve a grammar by name or exit with status 2.
pub fn require_grammar(name: &str) -> &'static Grammar {
    find(name).unwrap_or_else(|| {
        eprintln!("error: unknown grammar '{}'", name);
        eprintln!();
        eprintln!("Run 'regexpr grammars' for the full list.");
        std::process::exit(2);
    })
}
