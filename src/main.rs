mod cli;
mod execute;

use std::process::ExitCode;
use clap::Parser;
use clap::error::ErrorKind;
use colored::Colorize;
use crate::cli::CLI;

fn main() -> ExitCode {
    let cli = match CLI::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };
    eigen_fetch::logging::init(cli.verbose);
    match execute::execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
