//! `section-reader <scenario.toml>`: build the page a scenario describes, play
//! its steps through the shell and picker, and print the page after each one.

mod run;
mod scenario;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mimalloc::MiMalloc;

use crate::scenario::Scenario;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser, Debug)]
#[command(name = "section-reader")]
#[command(about = "Play a section picker scenario against a headless page")]
#[command(version)]
struct Cli {
    /// Scenario file describing the page and the steps to play
    scenario: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    let result = Scenario::load(&cli.scenario)
        .and_then(|scenario| run::execute(&scenario, &mut std::io::stdout().lock()));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!(target: "section_reader", "{err}");
            eprintln!("section-reader: {err}");
            ExitCode::FAILURE
        }
    }
}
