//! Error types for the iptax core.
//!
//! The taxonomy follows the propagation policy of the tool: storage
//! corruption is recovered locally (a backup plus a warning, never an error),
//! missing-record lookups are recoverable and left to the caller, and range
//! derivation errors are fatal to the current operation because a silently
//! guessed date range risks mis-reporting.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::month::MonthKey;

/// Failure reading or writing a record store file.
///
/// Note that a *malformed* file is deliberately not represented here:
/// [`crate::store::RecordStore::load`] quarantines the bad file and degrades
/// to an empty collection instead of failing.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("store i/o failed for {path}: {source}")]
    Io {
        /// File the operation targeted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A document could not be encoded before writing.
    #[error("failed to encode {path}: {source}")]
    Encode {
        /// File the document was headed for.
        path: PathBuf,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from judgment cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A user decision was recorded against a change that has no judgment.
    ///
    /// A decision cannot be overridden before it exists; the review flow
    /// must ingest the automated judgment first.
    #[error("no judgment recorded for change '{change_id}'")]
    NotFound {
        /// The unknown change identifier.
        change_id: String,
    },

    /// Underlying store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from date-range derivation.
#[derive(Debug, Error)]
pub enum RangeError {
    /// The derived start date falls after the end date.
    ///
    /// Fatal to the current operation and surfaced to the operator
    /// unmodified — the range is never silently clamped.
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange {
        /// Derived collection start.
        start: NaiveDate,
        /// Derived collection end.
        end: NaiveDate,
    },

    /// No prior period exists and no fallback start date was supplied.
    ///
    /// On first-ever use the start date must come from the operator; it is
    /// never assumed.
    #[error("no prior period before {target}; supply a fallback start date for the first report")]
    NoPriorPeriod {
        /// The period whose range was requested.
        target: MonthKey,
    },
}

/// A string failed to parse as a `YYYY-MM` month key or month spec.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid month '{0}', expected YYYY-MM")]
pub struct MonthParseError(pub String);
