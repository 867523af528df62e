//! `iptax range` — derive the collection window for a reporting month.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use iptax_core::{
    MonthKey, MonthSpec, PeriodLedger, RangeError, RangeSettings, ReportWindows,
    compute_report_windows, default_fallback_start,
};

use crate::commands::{CmdContext, print_json};

/// Resolve the month, compute both report windows, and print them.
///
/// On the first-ever run there is no prior cutoff to continue from; the
/// operator supplies the collection start via `--first-start` or, in
/// interactive mode, a stdin prompt defaulting to the 25th of the preceding
/// month. It is never assumed silently.
pub fn run(
    ctx: &CmdContext,
    month: Option<MonthSpec>,
    first_start: Option<NaiveDate>,
) -> Result<()> {
    let settings = iptax_settings::get_settings();
    let ledger = PeriodLedger::open(&ctx.ledger_path)?;
    let target = month.unwrap_or_default().resolve(ctx.today);

    let mut range_settings = RangeSettings {
        span_warn_days: settings.history.span_warn_days,
        fallback_start: first_start,
    };

    let windows = match compute_report_windows(&ledger, target, ctx.today, &range_settings) {
        Err(RangeError::NoPriorPeriod { .. }) => {
            if ctx.json {
                bail!("no prior period on record for {target}; pass --first-start");
            }
            range_settings.fallback_start = Some(prompt_fallback_start(target)?);
            compute_report_windows(&ledger, target, ctx.today, &range_settings)?
        }
        other => other?,
    };

    if ctx.json {
        return print_json(&windows);
    }
    print_windows(&windows);
    Ok(())
}

fn print_windows(windows: &ReportWindows) {
    println!("month:     {}", windows.month);
    println!(
        "timesheet: {} .. {}",
        windows.timesheet_start, windows.timesheet_end
    );
    println!(
        "changes:   {} .. {}",
        windows.changes.start, windows.changes.end
    );
    for warning in &windows.changes.warnings {
        eprintln!("warning: {warning}");
    }
}

fn prompt_fallback_start(target: MonthKey) -> Result<NaiveDate> {
    let default = default_fallback_start(target);
    eprint!("no prior period on record; collection start [{default}]: ");
    std::io::stderr().flush()?;

    let mut line = String::new();
    let _ = std::io::stdin()
        .read_line(&mut line)
        .context("failed to read collection start from stdin")?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Ok(default)
    } else {
        trimmed
            .parse()
            .with_context(|| format!("expected YYYY-MM-DD, got {trimmed:?}"))
    }
}
