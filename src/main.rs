use std::process::ExitCode;

use clap::Parser;
use cigarcheck::command::Commands;
use cigarcheck::runtime::{setup_global_logger, LogLevel};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// trace, debug, info, warn or error. Defaults to RUST_LOG, else info
    #[arg(long = "log-level", global = true, value_parser = clap::value_parser!(LogLevel))]
    log_level: Option<LogLevel>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_global_logger(cli.log_level);
    log::debug!("Running {:?}", cli.command);

    let result = match cli.command {
        Commands::Compare(mut cmd) => cmd.try_execute(),
        Commands::Sample(mut cmd) => cmd.try_execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
