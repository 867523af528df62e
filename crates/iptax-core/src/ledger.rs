//! Reporting-period ledger.
//!
//! One [`PeriodRecord`] per generated monthly report, keyed by
//! [`MonthKey`]. The ledger is the continuity anchor between reports: the
//! next report's collection window starts the day after the previous
//! period's cutoff, and any skipped months are detected rather than silently
//! swallowed.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::month::MonthKey;
use crate::store::RecordStore;

/// Schema version written into new ledger files.
pub const LEDGER_VERSION: &str = "1.0";

/// On-disk schema of the period ledger file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LedgerFile {
    /// Schema version of the document.
    pub ledger_version: String,
    /// Period records keyed by `"YYYY-MM"`.
    pub periods: BTreeMap<MonthKey, PeriodRecord>,
}

impl Default for LedgerFile {
    fn default() -> Self {
        Self {
            ledger_version: LEDGER_VERSION.to_string(),
            periods: BTreeMap::new(),
        }
    }
}

/// Continuity record for one reporting period.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRecord {
    /// Last day included in this period's change-collection window; the
    /// next period starts the day after.
    pub cutoff_date: NaiveDate,
    /// When the report was first generated (UTC).
    pub generated_at: DateTime<Utc>,
    /// When the report was last regenerated, if ever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regenerated_at: Option<DateTime<Utc>>,
}

/// The reporting-period ledger.
pub struct PeriodLedger {
    store: RecordStore<LedgerFile>,
    file: LedgerFile,
}

impl PeriodLedger {
    /// Open the ledger at `path`, loading any existing document.
    pub fn open(path: impl Into<std::path::PathBuf>) -> Result<Self, StoreError> {
        let store = RecordStore::new(path);
        let file = store.load()?;
        Ok(Self { store, file })
    }

    /// Persist the in-memory collection.
    pub fn save(&self) -> Result<(), StoreError> {
        self.store.save(&self.file)
    }

    /// Backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Look up the record for one period.
    #[must_use]
    pub fn get(&self, period: MonthKey) -> Option<&PeriodRecord> {
        self.file.periods.get(&period)
    }

    /// The chronologically latest record, if any.
    ///
    /// Valid because `"YYYY-MM"` keys order chronologically.
    #[must_use]
    pub fn latest(&self) -> Option<(MonthKey, &PeriodRecord)> {
        self.file.periods.iter().next_back().map(|(k, v)| (*k, v))
    }

    /// The latest record strictly before `period`.
    ///
    /// This, not [`latest`](Self::latest), is the prior boundary when a
    /// mid-history period is being regenerated.
    #[must_use]
    pub fn previous_before(&self, period: MonthKey) -> Option<(MonthKey, &PeriodRecord)> {
        self.file
            .periods
            .range(..period)
            .next_back()
            .map(|(k, v)| (*k, v))
    }

    /// Whether any period after `period` has been committed.
    #[must_use]
    pub fn has_successor(&self, period: MonthKey) -> bool {
        self.file
            .periods
            .range(period.next()..)
            .next()
            .is_some()
    }

    /// Record a successful generation of `period` with the given cutoff.
    ///
    /// First commit creates the record with `generated_at = now`; committing
    /// an existing period updates its cutoff and stamps `regenerated_at`,
    /// leaving `generated_at` untouched. Records are never deleted.
    pub fn commit(&mut self, period: MonthKey, cutoff_date: NaiveDate, now: DateTime<Utc>) {
        match self.file.periods.entry(period) {
            Entry::Occupied(mut occupied) => {
                let record = occupied.get_mut();
                record.cutoff_date = cutoff_date;
                record.regenerated_at = Some(now);
                tracing::debug!(%period, %cutoff_date, "period regenerated");
            }
            Entry::Vacant(vacant) => {
                let _ = vacant.insert(PeriodRecord {
                    cutoff_date,
                    generated_at: now,
                    regenerated_at: None,
                });
                tracing::debug!(%period, %cutoff_date, "period committed");
            }
        }
    }

    /// Period keys strictly between the previous record and `period` that
    /// have no record of their own.
    ///
    /// Gaps are allowed (leave happens) but must be surfaced to the
    /// operator, never silently skipped.
    #[must_use]
    pub fn detect_gap(&self, period: MonthKey) -> Vec<MonthKey> {
        let Some((prev, _)) = self.previous_before(period) else {
            return Vec::new();
        };
        let mut missing = Vec::new();
        let mut cursor = prev.next();
        while cursor < period {
            if !self.file.periods.contains_key(&cursor) {
                missing.push(cursor);
            }
            cursor = cursor.next();
        }
        missing
    }

    /// Iterate over all records in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (MonthKey, &PeriodRecord)> {
        self.file.periods.iter().map(|(k, v)| (*k, v))
    }

    /// Number of recorded periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.file.periods.len()
    }

    /// Whether the ledger holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.file.periods.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
