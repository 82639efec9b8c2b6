mod cli;
mod commands;
mod config;
mod logging;
mod terminal;

use std::process::ExitCode;

use linguapedia_logging::lp_error;

fn main() -> ExitCode {
    let matches = cli::build().get_matches();
    match commands::run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            lp_error!("{:#}", err);
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
