//! `iptax history` — reporting-period ledger inspection and commits.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use iptax_core::{MonthKey, PeriodLedger, PeriodRecord};
use serde::Serialize;

use crate::commands::{CmdContext, print_json};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PeriodRow {
    month: MonthKey,
    #[serde(flatten)]
    record: PeriodRecord,
}

/// Print every committed period, oldest first.
pub fn list(ctx: &CmdContext) -> Result<()> {
    let ledger = PeriodLedger::open(&ctx.ledger_path)?;
    let rows: Vec<PeriodRow> = ledger
        .iter()
        .map(|(month, record)| PeriodRow {
            month,
            record: record.clone(),
        })
        .collect();

    if ctx.json {
        return print_json(&rows);
    }
    for row in rows {
        let regenerated = row
            .record
            .regenerated_at
            .map(|at| format!("\tregenerated {}", at.format("%Y-%m-%d")))
            .unwrap_or_default();
        println!(
            "{}\t{}\tgenerated {}{}",
            row.month,
            row.record.cutoff_date,
            row.record.generated_at.format("%Y-%m-%d"),
            regenerated
        );
    }
    Ok(())
}

/// Commit (or update) a period's cutoff after a report was generated.
pub fn commit(ctx: &CmdContext, month: MonthKey, cutoff: NaiveDate) -> Result<()> {
    let mut ledger = PeriodLedger::open(&ctx.ledger_path)?;
    let regeneration = ledger.get(month).is_some();
    ledger.commit(month, cutoff, Utc::now());
    ledger.save()?;

    // The record just committed is always present.
    let record = ledger.get(month).cloned();
    if ctx.json {
        return print_json(&record.map(|record| PeriodRow { month, record }));
    }
    if regeneration {
        println!("updated {month} cutoff to {cutoff}");
    } else {
        println!("committed {month} with cutoff {cutoff}");
    }
    Ok(())
}
