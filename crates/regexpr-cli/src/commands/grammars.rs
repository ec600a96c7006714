use std::fmt::Write as _;

use regexpr_lib::grammars::Grammar;

pub fn run() {
    print!("{}", listing(regexpr_lib::grammars::all()));
}

pub fn listing(grammars: &[Grammar]) -> String {
    let width = grammars.iter().map(|g| g.name.len()).max().unwrap_or(0);
    let mut out = format!("Example grammars ({}):\n", grammars.len());
    for g in grammars {
        writeln!(out, "  {:width$}  {}", g.name, g.description).expect("String write never fails");
    }
    out
}
