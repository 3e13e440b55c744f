// freezefix-cli/src/main.rs
//
// Entry point for the `freezefix` binary: parses arguments, sets up logging,
// dispatches the subcommand and maps failures to exit status 1.

use clap::Parser;
use freezefix_cli::{Cli, Commands, logging, run_check, run_detect};
use owo_colors::OwoColorize;
use std::process;

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Detect(args) => run_detect(args, cli.quiet),
        Commands::Check(args) => run_check(args),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
