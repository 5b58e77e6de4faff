//! Quarters: office and living-space allocation.
//!
//! Interactive command-per-line interface over the allocator: create
//! rooms, admit people, move them between rooms, render reports, and
//! persist sessions to SQLite.
//!
//! Usage:
//!   quarters
//!   quarters --db campus.db --verbose

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod loader;
mod output;
mod session;

use commands::ReplLine;
use session::Session;

#[derive(Parser)]
#[command(name = "quarters")]
#[command(about = "Office and living-space allocation", long_about = None)]
#[command(version)]
struct Cli {
    /// State database used by save-state / load-state.
    #[arg(long, default_value = "quarters.db")]
    db: PathBuf,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    println!(
        "{}",
        "Welcome to the Quarters allocation program! (type help for a list of commands.)".bold()
    );

    let mut session = Session::new(rand::thread_rng(), cli.db);
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("{} ", "(quarters)".cyan());
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        match ReplLine::try_parse_from(tokens) {
            Ok(repl) => {
                if !session.execute(repl.command) {
                    break;
                }
            }
            // clap renders its own usage and help text.
            Err(err) => {
                let _ = err.print();
            }
        }
    }
    Ok(())
}
