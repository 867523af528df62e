//! Command implementations.
//!
//! Each command loads the store it needs once, mutates in memory, and saves
//! once before printing.

pub mod cache;
pub mod history;
pub mod range;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// Shared per-invocation state resolved from global flags and settings.
pub struct CmdContext {
    /// Machine-readable output requested.
    pub json: bool,
    /// Judgment cache file.
    pub cache_path: PathBuf,
    /// Period ledger file.
    pub ledger_path: PathBuf,
    /// The calendar date commands treat as "today".
    pub today: NaiveDate,
}

impl CmdContext {
    /// Build the context from the global flags.
    ///
    /// `--cache-dir` relocates both store files. `IPTAX_FAKE_DATE` pins
    /// "today" for reproducible runs.
    pub fn new(json: bool, cache_dir: Option<PathBuf>) -> Result<Self> {
        let (cache_path, ledger_path) = match cache_dir {
            Some(dir) => (dir.join("ai_cache.json"), dir.join("history.json")),
            None => (
                iptax_settings::judgment_cache_path(),
                iptax_settings::ledger_path(),
            ),
        };
        Ok(Self {
            json,
            cache_path,
            ledger_path,
            today: resolve_today()?,
        })
    }
}

fn resolve_today() -> Result<NaiveDate> {
    match std::env::var("IPTAX_FAKE_DATE") {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("IPTAX_FAKE_DATE must be YYYY-MM-DD, got {raw:?}")),
        Err(_) => Ok(chrono::Local::now().date_naive()),
    }
}

/// Envelope for `--json` output.
#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    /// Always `true` on the success path; failures exit nonzero with the
    /// error on stderr instead.
    pub ok: bool,
    /// Command-specific payload.
    pub data: T,
}

/// Print the standard JSON envelope around `data`.
pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&JsonOut { ok: true, data })?
    );
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
