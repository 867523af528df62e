//! Collection date-range derivation.
//!
//! Given the period ledger, a target month, and "today", derive the exact
//! window of changes to collect. The policy mirrors the statutory payment
//! deadline that drives the workflow: on days 1–10 the tool is finalizing
//! the previous calendar month, so the window closes on the target month's
//! last day; later in the month it is actively collecting, so the window
//! closes on `today`.
//!
//! Both functions here are pure — "today" is a parameter, never read from
//! the clock.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::errors::RangeError;
use crate::ledger::PeriodLedger;
use crate::month::{MonthKey, PAYMENT_DEADLINE_DAY};

/// Tunables for range derivation.
#[derive(Clone, Copy, Debug)]
pub struct RangeSettings {
    /// Warn when the window spans more than this many days.
    pub span_warn_days: i64,
    /// Start date to use when the ledger holds no prior period.
    ///
    /// Must come from the operator on first-ever use; `compute_range` fails
    /// with [`RangeError::NoPriorPeriod`] rather than assume one. See
    /// [`default_fallback_start`] for the value to suggest.
    pub fallback_start: Option<NaiveDate>,
}

impl Default for RangeSettings {
    fn default() -> Self {
        Self {
            span_warn_days: 31,
            fallback_start: None,
        }
    }
}

/// Non-fatal findings about a derived range.
///
/// The surrounding workflow is expected to show these to the operator
/// before proceeding.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum RangeWarning {
    /// The window spans more days than the configured threshold, which
    /// usually means one or more months were never reported.
    #[serde(rename = "oversizedSpan")]
    OversizedSpan {
        /// Days between start and end.
        days: i64,
    },
    /// Months between the previous record and the target with no record.
    #[serde(rename = "missingPeriods")]
    MissingPeriods {
        /// The skipped period keys, in order.
        periods: Vec<MonthKey>,
    },
}

impl fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OversizedSpan { days } => {
                write!(f, "date range spans {days} days; missing reports are likely")
            }
            Self::MissingPeriods { periods } => {
                let list: Vec<String> = periods.iter().map(MonthKey::to_string).collect();
                write!(f, "no report recorded for: {}", list.join(", "))
            }
        }
    }
}

/// A derived collection window plus any warnings.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedRange {
    /// First day of the collection window.
    pub start: NaiveDate,
    /// Last day of the collection window (the cutoff to commit afterwards).
    pub end: NaiveDate,
    /// Anomalies the operator should review.
    pub warnings: Vec<RangeWarning>,
}

/// Both windows a report needs: the full-calendar-month timesheet window
/// and the ledger-driven change-collection window.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportWindows {
    /// The reporting period.
    pub month: MonthKey,
    /// Timesheet window start (always the 1st).
    pub timesheet_start: NaiveDate,
    /// Timesheet window end (always the month's last day).
    pub timesheet_end: NaiveDate,
    /// Change-collection window.
    pub changes: ComputedRange,
}

/// The start date to suggest to the operator on first-ever use: the 25th of
/// the month preceding the target.
#[must_use]
pub fn default_fallback_start(target: MonthKey) -> NaiveDate {
    let prev = target.prev();
    NaiveDate::from_ymd_opt(prev.year(), prev.month(), 25)
        .expect("day 25 exists in every month")
}

/// Derive the change-collection window for `target`.
///
/// - `start` is the day after the previous period's cutoff, or the
///   operator-supplied fallback when no prior period exists.
/// - `end` follows the finalization policy, except that regenerating a
///   period with a committed successor reuses its original cutoff so the
///   boundary with the next period never moves.
/// - `start > end` is fatal ([`RangeError::InvalidRange`]); oversized spans
///   and skipped months are warnings, not errors.
pub fn compute_range(
    ledger: &PeriodLedger,
    target: MonthKey,
    today: NaiveDate,
    settings: &RangeSettings,
) -> Result<ComputedRange, RangeError> {
    let end = match ledger.get(target) {
        // Regeneration with a later period on record: the original window
        // is reproduced so the successor's start date stays valid.
        Some(record) if ledger.has_successor(target) => record.cutoff_date,
        _ => {
            if today.day() <= PAYMENT_DEADLINE_DAY {
                target.last_day()
            } else {
                today
            }
        }
    };

    let start = match ledger.previous_before(target) {
        Some((_, prev)) => prev.cutoff_date.succ_opt().unwrap_or(NaiveDate::MAX),
        None => settings
            .fallback_start
            .ok_or(RangeError::NoPriorPeriod { target })?,
    };

    if start > end {
        return Err(RangeError::InvalidRange { start, end });
    }

    let mut warnings = Vec::new();
    let missing = ledger.detect_gap(target);
    if !missing.is_empty() {
        warnings.push(RangeWarning::MissingPeriods { periods: missing });
    }
    let days = (end - start).num_days();
    if days > settings.span_warn_days {
        warnings.push(RangeWarning::OversizedSpan { days });
    }

    Ok(ComputedRange {
        start,
        end,
        warnings,
    })
}

/// Derive the full pair of report windows for `target`.
pub fn compute_report_windows(
    ledger: &PeriodLedger,
    target: MonthKey,
    today: NaiveDate,
    settings: &RangeSettings,
) -> Result<ReportWindows, RangeError> {
    let changes = compute_range(ledger, target, today, settings)?;
    Ok(ReportWindows {
        month: target,
        timesheet_start: target.first_day(),
        timesheet_end: target.last_day(),
        changes,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{DateTime, Utc};

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn committed_at() -> DateTime<Utc> {
        "2024-11-01T10:00:00Z".parse().unwrap()
    }

    fn ledger_with(entries: &[(&str, &str)]) -> (tempfile::TempDir, PeriodLedger) {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = PeriodLedger::open(dir.path().join("history.json")).unwrap();
        for (m, cutoff) in entries {
            ledger.commit(month(m), date(cutoff), committed_at());
        }
        (dir, ledger)
    }

    #[test]
    fn continues_from_previous_cutoff_while_collecting() {
        let (_dir, ledger) = ledger_with(&[("2024-10", "2024-10-26")]);

        let range = compute_range(
            &ledger,
            month("2024-11"),
            date("2024-11-27"),
            &RangeSettings::default(),
        )
        .unwrap();

        assert_eq!(range.start, date("2024-10-27"));
        assert_eq!(range.end, date("2024-11-27"));
        assert!(range.warnings.is_empty());
    }

    #[test]
    fn finalization_window_closes_on_month_end() {
        let (_dir, ledger) = ledger_with(&[("2024-10", "2024-10-26")]);

        // Day 5 of December: finalizing November.
        let range = compute_range(
            &ledger,
            month("2024-11"),
            date("2024-12-05"),
            &RangeSettings::default(),
        )
        .unwrap();

        assert_eq!(range.start, date("2024-10-27"));
        assert_eq!(range.end, date("2024-11-30"));
    }

    #[test]
    fn first_ever_run_requires_fallback() {
        let (_dir, ledger) = ledger_with(&[]);

        let err = compute_range(
            &ledger,
            month("2024-11"),
            date("2024-11-27"),
            &RangeSettings::default(),
        )
        .unwrap_err();
        assert_matches!(err, RangeError::NoPriorPeriod { target } if target == month("2024-11"));

        let settings = RangeSettings {
            fallback_start: Some(default_fallback_start(month("2024-11"))),
            ..RangeSettings::default()
        };
        let range =
            compute_range(&ledger, month("2024-11"), date("2024-11-27"), &settings).unwrap();
        assert_eq!(range.start, date("2024-10-25"));
        assert_eq!(range.end, date("2024-11-27"));
    }

    #[test]
    fn start_after_end_is_fatal() {
        // The prior cutoff already lies past today's collection end.
        let (_dir, ledger) =
            ledger_with(&[("2024-10", "2024-10-26"), ("2024-11", "2024-11-28")]);

        let err = compute_range(
            &ledger,
            month("2024-12"),
            date("2024-11-28"),
            &RangeSettings::default(),
        )
        .unwrap_err();
        assert_matches!(
            err,
            RangeError::InvalidRange { start, end }
                if start == date("2024-11-29") && end == date("2024-11-28")
        );
    }

    #[test]
    fn single_day_range_is_valid() {
        let (_dir, ledger) =
            ledger_with(&[("2024-10", "2024-10-26"), ("2024-11", "2024-11-28")]);

        let range = compute_range(
            &ledger,
            month("2024-12"),
            date("2024-11-29"),
            &RangeSettings::default(),
        )
        .unwrap();
        assert_eq!(range.start, range.end);
    }

    #[test]
    fn gap_and_span_warnings_surface_together() {
        let (_dir, ledger) = ledger_with(&[("2024-10", "2024-10-26")]);

        let range = compute_range(
            &ledger,
            month("2024-12"),
            date("2024-12-27"),
            &RangeSettings::default(),
        )
        .unwrap();

        assert_eq!(range.start, date("2024-10-27"));
        assert_eq!(range.end, date("2024-12-27"));
        assert_eq!(range.warnings.len(), 2);
        assert_matches!(
            &range.warnings[0],
            RangeWarning::MissingPeriods { periods } if *periods == vec![month("2024-11")]
        );
        assert_matches!(&range.warnings[1], RangeWarning::OversizedSpan { days } if *days == 61);
    }

    #[test]
    fn exactly_threshold_span_does_not_warn() {
        let (_dir, ledger) = ledger_with(&[("2024-10", "2024-10-26")]);

        // 2024-10-27 to 2024-11-27 is exactly 31 days apart.
        let range = compute_range(
            &ledger,
            month("2024-11"),
            date("2024-11-27"),
            &RangeSettings::default(),
        )
        .unwrap();
        assert!(range.warnings.is_empty());
    }

    #[test]
    fn regeneration_with_successor_reuses_original_cutoff() {
        let (_dir, ledger) = ledger_with(&[
            ("2024-10", "2024-10-26"),
            ("2024-11", "2024-11-26"),
            ("2024-12", "2024-12-27"),
        ]);

        // Regenerating November months later must reproduce its original
        // window, not extend it to "today".
        let range = compute_range(
            &ledger,
            month("2024-11"),
            date("2025-02-15"),
            &RangeSettings::default(),
        )
        .unwrap();
        assert_eq!(range.start, date("2024-10-27"));
        assert_eq!(range.end, date("2024-11-26"));
        assert!(range.warnings.is_empty());
    }

    #[test]
    fn regeneration_of_latest_period_may_extend() {
        let (_dir, ledger) =
            ledger_with(&[("2024-10", "2024-10-26"), ("2024-11", "2024-11-26")]);

        // November is the latest period; regenerating it later in November
        // extends the window to today.
        let range = compute_range(
            &ledger,
            month("2024-11"),
            date("2024-11-29"),
            &RangeSettings::default(),
        )
        .unwrap();
        assert_eq!(range.start, date("2024-10-27"));
        assert_eq!(range.end, date("2024-11-29"));
    }

    #[test]
    fn default_fallback_is_25th_of_preceding_month() {
        assert_eq!(
            default_fallback_start(month("2024-11")),
            date("2024-10-25")
        );
        assert_eq!(
            default_fallback_start(month("2025-01")),
            date("2024-12-25")
        );
    }

    #[test]
    fn report_windows_pair_timesheet_and_changes() {
        let (_dir, ledger) = ledger_with(&[("2024-10", "2024-10-26")]);

        let windows = compute_report_windows(
            &ledger,
            month("2024-11"),
            date("2024-11-27"),
            &RangeSettings::default(),
        )
        .unwrap();

        assert_eq!(windows.timesheet_start, date("2024-11-01"));
        assert_eq!(windows.timesheet_end, date("2024-11-30"));
        assert_eq!(windows.changes.start, date("2024-10-27"));
        assert_eq!(windows.changes.end, date("2024-11-27"));
    }

    #[test]
    fn warning_display_is_operator_readable() {
        let w = RangeWarning::MissingPeriods {
            periods: vec![month("2024-11"), month("2024-12")],
        };
        assert_eq!(w.to_string(), "no report recorded for: 2024-11, 2024-12");

        let w = RangeWarning::OversizedSpan { days: 61 };
        assert!(w.to_string().contains("61 days"));
    }
}
