//! # iptax-core
//!
//! Decision-continuity core for monthly IP-tax reports.
//!
//! The surrounding workflow combines three flaky external signals (a
//! change-tracking feed, an LLM relevance judge, and a timesheet) into a
//! compliant monthly report. This crate is the only stateful part of that
//! pipeline:
//!
//! - **[`store::RecordStore`]**: generic keyed-document file store with
//!   atomic writes and corruption recovery (shared primitive)
//! - **[`cache::JudgmentCache`]**: persisted AI/human relevance decisions,
//!   one [`judgment::Judgment`] per change identifier
//! - **[`selector::select_history`]**: pure selection of a bounded,
//!   ratio-balanced learning context for the LLM prompt
//! - **[`ledger::PeriodLedger`]**: one [`ledger::PeriodRecord`] per reporting
//!   month, anchoring period continuity
//! - **[`daterange::compute_range`]**: derives each report's collection
//!   window from the ledger, with the statutory finalization policy
//!
//! Everything here is synchronous and single-process: each store file is
//! read once per invocation, mutated in memory, and written once via
//! `save()`. The crate performs no network I/O and never reads the wall
//! clock inside its pure functions — "today" and "now" are parameters.
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by `iptax-settings` consumers and the
//! `iptax` CLI.

#![deny(unsafe_code)]

pub mod cache;
pub mod daterange;
pub mod errors;
pub mod judgment;
pub mod ledger;
pub mod month;
pub mod selector;
pub mod store;

pub use cache::{CacheStats, JudgmentCache};
pub use daterange::{
    ComputedRange, RangeSettings, RangeWarning, ReportWindows, compute_range,
    compute_report_windows, default_fallback_start,
};
pub use errors::{CacheError, MonthParseError, RangeError, StoreError};
pub use judgment::{Decision, Judgment, UserDecision, merge_judgment};
pub use ledger::{PeriodLedger, PeriodRecord};
pub use month::{MonthKey, MonthSpec, PAYMENT_DEADLINE_DAY};
pub use selector::{SelectionSettings, select_history};
pub use store::RecordStore;
