mod cli;
mod commands;

use cli::{GrammarsParams, ParseParams, RenderParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("grammars", m)) => {
            let _params = GrammarsParams::from_matches(m);
            commands::grammars::run();
        }
        Some(("render", m)) => {
            let params = RenderParams::from_matches(m);
            commands::render::run(params.into());
        }
        Some(("parse", m)) => {
            let params = ParseParams::from_matches(m);
            commands::parse::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
