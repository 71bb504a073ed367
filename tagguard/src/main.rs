// tagguard/src/main.rs
//! TagGuard entry point.
//!
//! Parses the command line, sets up logging, builds the effective rule set
//! and dispatches to the chosen subcommand.

use anyhow::Result;
use clap::Parser;
use std::io;

use tagguard::cli::{Cli, Commands};
use tagguard::commands::{self, classify, rule, scan};
use tagguard::logger;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    logger::init_logger(logger::level_from_flags(args.debug, args.quiet));

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &args.command {
        Commands::Classify(cmd) => {
            let config = commands::load_rule_set(args.config.as_deref(), &args.enable, &args.disable)?;
            classify::run_classify(&config, cmd, &mut out)
        }
        Commands::Scan(cmd) => {
            let config = commands::load_rule_set(args.config.as_deref(), &args.enable, &args.disable)?;
            scan::run_scan(&config, cmd, &mut out).await
        }
        Commands::Rule(cmd) => rule::run_rule(cmd, &mut out),
    }
}
