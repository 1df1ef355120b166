// blockclean/src/main.rs
//! BlockClean entry point.
//!
//! Loads `.env`, parses the command line, initializes logging and dispatches
//! to the selected command. Any failure is printed to stderr and turns into a
//! non-zero exit code.

use clap::Parser;
use log::LevelFilter;
use std::process::ExitCode;

use blockclean::cli::{Cli, Commands};
use blockclean::commands::{sanitize, tools, validate};
use blockclean::logger;
use blockclean::ui::output_format::error_msg;

fn main() -> ExitCode {
    // A missing .env file is not an error.
    dotenvy::dotenv().ok();

    let args = Cli::parse();

    let level = if args.quiet {
        Some(LevelFilter::Off)
    } else if args.debug {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);

    let result = match &args.command {
        Commands::Validate(cmd) => validate::run_validate(cmd, args.quiet),
        Commands::Sanitize(cmd) => sanitize::run_sanitize(cmd, args.quiet),
        Commands::Tools(cmd) => tools::run_tools(cmd),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error_msg(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
