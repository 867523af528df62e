//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use iptax_core::{MonthKey, MonthSpec, UserDecision};

/// Monthly IP-tax reporting: judgment cache and period ledger.
#[derive(Parser, Debug)]
#[command(name = "iptax", version, about = "Monthly IP-tax report continuity tool")]
pub struct Cli {
    /// Output machine-readable JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Override the cache directory holding `ai_cache.json` and
    /// `history.json`.
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the change-collection window for a reporting month.
    Range {
        /// Month to report on: `auto` (default), `current`, `last`, or
        /// `YYYY-MM`.
        month: Option<MonthSpec>,

        /// Collection start for the first-ever report (YYYY-MM-DD). Skips
        /// the interactive prompt.
        #[arg(long, value_name = "DATE")]
        first_start: Option<NaiveDate>,
    },

    /// Inspect and update the reporting-period ledger.
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },

    /// Inspect and update the judgment learning cache.
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

/// `iptax history` subcommands.
#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List all committed reporting periods.
    List,

    /// Record (or update) a period's cutoff after report generation.
    Commit {
        /// Reporting month, `YYYY-MM`.
        month: MonthKey,

        /// Last day covered by the generated report (YYYY-MM-DD).
        #[arg(long, value_name = "DATE")]
        cutoff: NaiveDate,
    },
}

/// `iptax cache` subcommands.
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Print aggregate cache statistics.
    Stats {
        /// Count only judgments for this product.
        #[arg(long)]
        product: Option<String>,
    },

    /// Print one judgment in full.
    Show {
        /// Change identifier, e.g. `github.com/owner/repo#123`.
        change_id: String,
    },

    /// Remove all judgments for a product.
    Clear {
        /// Product whose judgments are dropped.
        #[arg(long)]
        product: String,
    },

    /// Record the reviewer's final decision for a judgment.
    Override {
        /// Change identifier of the judgment to correct.
        change_id: String,

        /// The reviewer's decision.
        #[arg(long, value_enum)]
        decision: DecisionArg,

        /// Why the reviewer decided differently.
        #[arg(long)]
        reasoning: Option<String>,
    },

    /// Ingest automated judgments from a JSON array file.
    Import {
        /// File containing a JSON array of judgments.
        file: PathBuf,
    },

    /// Print the learning context the selector would hand to the judge.
    History {
        /// Product scope; defaults to the configured product.
        #[arg(long)]
        product: Option<String>,

        /// Maximum entries; defaults to the configured `ai.maxLearnings`.
        #[arg(long)]
        max: Option<usize>,

        /// Correction ratio; defaults to the configured
        /// `ai.correctionRatio`.
        #[arg(long)]
        ratio: Option<f64>,
    },
}

/// Reviewer decision as a CLI flag value.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DecisionArg {
    /// The change counts toward the report.
    Include,
    /// The change does not count.
    Exclude,
}

impl From<DecisionArg> for UserDecision {
    fn from(arg: DecisionArg) -> Self {
        match arg {
            DecisionArg::Include => UserDecision::Include,
            DecisionArg::Exclude => UserDecision::Exclude,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
