// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telearc - a single-user chat archiver.
//!
//! This is the binary entry point for the Telearc archiver.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod status;

/// Telearc - a single-user chat archiver.
#[derive(Parser, Debug)]
#[command(name = "telearc", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show stored credential state and archive counters.
    Status,
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match telearc_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            telearc_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.archive.log_level);

    match cli.command {
        Some(Commands::Status) => {
            if let Err(err) = status::run_status(config).await {
                eprintln!("telearc status: {err}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(err) => {
                eprintln!("telearc config: {err}");
                std::process::exit(1);
            }
        },
        None => {
            println!("telearc: use --help for available commands");
        }
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("telearc={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }
}
