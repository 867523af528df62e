//! CLI entrypoint for the iptax decision-continuity stores.
//!
//! Exposes the judgment cache, period ledger, and range derivation as
//! subcommands. All state lives in two JSON files under the cache directory;
//! every command reads once, mutates in memory, and writes once.

#![deny(unsafe_code)]

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{CacheCommands, Cli, Commands, HistoryCommands};
use commands::CmdContext;

fn main() -> Result<()> {
    init_subscriber("warn");

    let cli = Cli::parse();
    let ctx = CmdContext::new(cli.json, cli.cache_dir)?;

    match cli.command {
        Commands::Range { month, first_start } => commands::range::run(&ctx, month, first_start),
        Commands::History { command } => match command {
            HistoryCommands::List => commands::history::list(&ctx),
            HistoryCommands::Commit { month, cutoff } => {
                commands::history::commit(&ctx, month, cutoff)
            }
        },
        Commands::Cache { command } => match command {
            CacheCommands::Stats { product } => commands::cache::stats(&ctx, product.as_deref()),
            CacheCommands::Show { change_id } => commands::cache::show(&ctx, &change_id),
            CacheCommands::Clear { product } => commands::cache::clear(&ctx, &product),
            CacheCommands::Override {
                change_id,
                decision,
                reasoning,
            } => commands::cache::override_decision(&ctx, &change_id, decision.into(), reasoning),
            CacheCommands::Import { file } => commands::cache::import(&ctx, &file),
            CacheCommands::History {
                product,
                max,
                ratio,
            } => commands::cache::history(&ctx, product, max, ratio),
        },
    }
}

/// Initialize the global tracing subscriber with stderr output only.
///
/// `RUST_LOG` overrides the default level. Subsequent calls are no-ops.
fn init_subscriber(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // try_init is a no-op if a subscriber is already set
    let _ = subscriber.try_init();
}
