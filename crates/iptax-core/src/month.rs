//! Reporting-period month keys and month-spec resolution.
//!
//! A [`MonthKey`] identifies one reporting period (`"YYYY-MM"`). It is the
//! key type of the period ledger and sorts chronologically both as a string
//! and through its derived ordering. [`MonthSpec`] translates CLI-level month
//! input (`auto`-detected, `current`, `last`, or explicit) into a concrete
//! key.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::MonthParseError;

/// Day-of-month boundary of the statutory payment deadline.
///
/// Employee payments for a month are due before the 10th of the following
/// month, so a run on days 1–10 is finalizing the *previous* month while a
/// run later in the month is collecting for the *current* one.
pub const PAYMENT_DEADLINE_DAY: u32 = 10;

// ─────────────────────────────────────────────────────────────────────────────
// MonthKey
// ─────────────────────────────────────────────────────────────────────────────

/// One reporting period, a calendar month.
///
/// Persists as a plain `"YYYY-MM"` string (including when used as a JSON map
/// key), so lexicographic order on disk matches chronological order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Create a key, validating that `month` is in `1..=12`.
    pub fn new(year: i32, month: u32) -> Result<Self, MonthParseError> {
        if (1..=12).contains(&month) {
            Ok(Self { year, month })
        } else {
            Err(MonthParseError(format!("{year}-{month:02}")))
        }
    }

    /// The month containing `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    #[must_use]
    pub fn year(self) -> i32 {
        self.year
    }

    /// Calendar month, `1..=12`.
    #[must_use]
    pub fn month(self) -> u32 {
        self.month
    }

    /// The following month.
    #[must_use]
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The preceding month.
    #[must_use]
    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// First calendar day of the month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        // Month is validated at construction, so day 1 always exists.
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("validated month has a first day")
    }

    /// Last calendar day of the month.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .expect("month start has a predecessor")
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MonthParseError(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        Self::new(year, month).map_err(|_| err())
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct MonthKeyVisitor;

impl Visitor<'_> for MonthKeyVisitor {
    type Value = MonthKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a month key in YYYY-MM format")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        value.parse().map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(MonthKeyVisitor)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MonthSpec
// ─────────────────────────────────────────────────────────────────────────────

/// Month selection as given on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MonthSpec {
    /// Pick by the payment-deadline rule: days 1–10 report the previous
    /// month, later days report the current month.
    #[default]
    Auto,
    /// Force the month containing `today`.
    Current,
    /// Force the month before the one containing `today`.
    Last,
    /// A specific `YYYY-MM` month.
    Explicit(MonthKey),
}

impl MonthSpec {
    /// Resolve the spec to a concrete month relative to `today`.
    #[must_use]
    pub fn resolve(self, today: NaiveDate) -> MonthKey {
        let current = MonthKey::from_date(today);
        match self {
            Self::Auto => {
                if today.day() <= PAYMENT_DEADLINE_DAY {
                    current.prev()
                } else {
                    current
                }
            }
            Self::Current => current,
            Self::Last => current.prev(),
            Self::Explicit(month) => month,
        }
    }
}

impl FromStr for MonthSpec {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "current" => Ok(Self::Current),
            "last" => Ok(Self::Last),
            other => other.parse().map(Self::Explicit),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
