mod app;
mod cli;
mod effects;
mod logging;
mod ui;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    logging::initialize(cli.log_destination(), cli.log_level());

    match app::run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("restyle error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
