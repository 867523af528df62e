//! Learning-context selection from the judgment cache.
//!
//! The LLM prompt has a bounded context window; this module picks the subset
//! of past judgments with the highest learning value. Corrections (where the
//! human overruled the automated judge) are over-represented because they
//! teach the judge what it got wrong, while some confirmed/untouched
//! decisions are kept as positive examples.
//!
//! [`select_history`] is pure: it never mutates the cache and never reads
//! the wall clock — recency comes from the timestamps stored in the
//! judgments themselves.

use crate::cache::JudgmentCache;
use crate::judgment::Judgment;

/// Tunables for history selection.
///
/// Defaults mirror the production configuration: up to 20 entries, 75% of
/// the slots reserved for corrections.
#[derive(Clone, Copy, Debug)]
pub struct SelectionSettings {
    /// Maximum number of judgments to return.
    pub max_entries: usize,
    /// Target fraction of slots given to corrections, in `[0, 1]`.
    pub correction_ratio: f64,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            max_entries: 20,
            correction_ratio: 0.75,
        }
    }
}

/// Select a bounded, ratio-balanced, recency-ordered learning context for
/// `product`.
///
/// Algorithm:
///
/// 1. Keep only judgments scoped to `product` — no cross-product leakage.
/// 2. Partition into corrected and uncorrected (unreviewed judgments count
///    as uncorrected).
/// 3. Sort each partition newest-first, ties broken by `change_id` ascending
///    for determinism.
/// 4. Reserve `floor(max_entries * correction_ratio)` slots for corrections,
///    the remainder for the rest.
/// 5. When one partition cannot fill its share, the other grows into the
///    spare slots, so a brand-new product with no corrections still fills
///    every slot from the uncorrected pool (and vice versa).
/// 6. Interleave the two selections starting with a corrected entry,
///    skipping whichever pool runs out first.
///
/// The result length is at most `max_entries` and may be shorter when the
/// product has fewer judgments overall.
#[must_use]
pub fn select_history(
    cache: &JudgmentCache,
    product: &str,
    settings: &SelectionSettings,
) -> Vec<Judgment> {
    let max_entries = settings.max_entries;
    // Upstream settings validation keeps the ratio in range; guard anyway so
    // a bad value cannot oversubscribe the correction slots.
    let ratio = settings.correction_ratio.clamp(0.0, 1.0);

    let mut corrected: Vec<&Judgment> = Vec::new();
    let mut uncorrected: Vec<&Judgment> = Vec::new();
    for judgment in cache.judgments().filter(|j| j.product == product) {
        if judgment.was_corrected() {
            corrected.push(judgment);
        } else {
            uncorrected.push(judgment);
        }
    }

    let newest_first = |a: &&Judgment, b: &&Judgment| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| a.change_id.cmp(&b.change_id))
    };
    corrected.sort_by(newest_first);
    uncorrected.sort_by(newest_first);

    let target_corrected = (max_entries as f64 * ratio).floor() as usize;
    let target_uncorrected = max_entries - target_corrected;

    let mut take_corrected = corrected.len().min(target_corrected);
    let mut take_uncorrected = uncorrected.len().min(target_uncorrected);

    // Redistribute shortfall toward whichever pool still has spare items.
    let mut remaining = max_entries - take_corrected - take_uncorrected;
    if remaining > 0 {
        let grow = remaining.min(uncorrected.len() - take_uncorrected);
        take_uncorrected += grow;
        remaining -= grow;
        take_corrected += remaining.min(corrected.len() - take_corrected);
    }

    let mut corrected = corrected.into_iter().take(take_corrected).peekable();
    let mut uncorrected = uncorrected.into_iter().take(take_uncorrected).peekable();

    let mut out = Vec::with_capacity(take_corrected + take_uncorrected);
    let mut want_corrected = true;
    while corrected.peek().is_some() || uncorrected.peek().is_some() {
        let next = if want_corrected {
            corrected.next().or_else(|| uncorrected.next())
        } else {
            uncorrected.next().or_else(|| corrected.next())
        };
        if let Some(judgment) = next {
            out.push(judgment.clone());
        }
        want_corrected = !want_corrected;
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
