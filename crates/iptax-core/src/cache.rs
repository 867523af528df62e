//! Persistent judgment cache.
//!
//! Stores one [`Judgment`] per change identifier in a versioned JSON
//! document. Mutations operate on the in-memory collection and become
//! durable only on [`JudgmentCache::save`] — each CLI invocation reads the
//! file once and writes it once.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CacheError, StoreError};
use crate::judgment::{Judgment, UserDecision, merge_judgment};
use crate::store::RecordStore;

/// Schema version written into new cache files.
pub const CACHE_VERSION: &str = "1.0";

/// On-disk schema of the judgment cache file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JudgmentFile {
    /// Schema version of the document.
    pub cache_version: String,
    /// Judgments keyed by `change_id`.
    pub judgments: BTreeMap<String, Judgment>,
}

impl Default for JudgmentFile {
    fn default() -> Self {
        Self {
            cache_version: CACHE_VERSION.to_string(),
            judgments: BTreeMap::new(),
        }
    }
}

/// Aggregate cache statistics for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Judgments counted (after the product filter, if any).
    pub total_judgments: usize,
    /// Judgments where the reviewer changed the outcome.
    pub corrected_count: usize,
    /// Judgments the reviewer confirmed or never touched.
    pub correct_count: usize,
    /// `corrected / total`, `0.0` for an empty selection.
    pub correction_rate: f64,
    /// Distinct products seen anywhere in the cache, sorted.
    pub products: Vec<String>,
    /// Timestamp of the oldest counted judgment.
    pub oldest_judgment: Option<DateTime<Utc>>,
    /// Timestamp of the newest counted judgment.
    pub newest_judgment: Option<DateTime<Utc>>,
}

/// The judgment learning cache.
pub struct JudgmentCache {
    store: RecordStore<JudgmentFile>,
    file: JudgmentFile,
}

impl JudgmentCache {
    /// Open the cache at `path`, loading any existing document.
    ///
    /// A missing file yields an empty cache; a corrupted one is quarantined
    /// by the store and likewise yields an empty cache.
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

    /// Look up a judgment by change identifier.
    #[must_use]
    pub fn get(&self, change_id: &str) -> Option<&Judgment> {
        self.file.judgments.get(change_id)
    }

    /// Insert or overwrite the judgment for its `change_id`.
    ///
    /// Replacement is whole-record, except that an existing user decision
    /// survives unless the incoming record supplies one of its own (see
    /// [`merge_judgment`]).
    pub fn upsert(&mut self, judgment: Judgment) {
        let merged = merge_judgment(self.file.judgments.get(&judgment.change_id), judgment);
        let _ = self
            .file
            .judgments
            .insert(merged.change_id.clone(), merged);
    }

    /// Record the reviewer's final decision for an existing judgment.
    pub fn record_user_decision(
        &mut self,
        change_id: &str,
        decision: UserDecision,
        reasoning: Option<String>,
    ) -> Result<(), CacheError> {
        let judgment =
            self.file
                .judgments
                .get_mut(change_id)
                .ok_or_else(|| CacheError::NotFound {
                    change_id: change_id.to_string(),
                })?;
        judgment.user_decision = Some(decision);
        judgment.user_reasoning = reasoning;
        Ok(())
    }

    /// Remove every judgment scoped to `product`, returning the count
    /// removed.
    pub fn clear_product(&mut self, product: &str) -> usize {
        let before = self.file.judgments.len();
        self.file.judgments.retain(|_, j| j.product != product);
        let removed = before - self.file.judgments.len();
        if removed > 0 {
            tracing::debug!(product, removed, "cleared product judgments");
        }
        removed
    }

    /// Iterate over all stored judgments.
    pub fn judgments(&self) -> impl Iterator<Item = &Judgment> {
        self.file.judgments.values()
    }

    /// Number of stored judgments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.file.judgments.len()
    }

    /// Whether the cache holds no judgments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.file.judgments.is_empty()
    }

    /// Compute statistics, optionally narrowed to one product.
    ///
    /// `products` always lists every scope seen in the cache, even when a
    /// filter narrows the counts — it answers "which products has this cache
    /// seen", not "which match the filter".
    #[must_use]
    pub fn stats(&self, product: Option<&str>) -> CacheStats {
        let counted: Vec<&Judgment> = self
            .file
            .judgments
            .values()
            .filter(|j| product.is_none_or(|p| j.product == p))
            .collect();

        let mut products: Vec<String> = self
            .file
            .judgments
            .values()
            .map(|j| j.product.clone())
            .collect();
        products.sort();
        products.dedup();

        let corrected_count = counted.iter().filter(|j| j.was_corrected()).count();
        let total_judgments = counted.len();
        let correction_rate = if total_judgments == 0 {
            0.0
        } else {
            corrected_count as f64 / total_judgments as f64
        };

        CacheStats {
            total_judgments,
            corrected_count,
            correct_count: total_judgments - corrected_count,
            correction_rate,
            products,
            oldest_judgment: counted.iter().map(|j| j.timestamp).min(),
            newest_judgment: counted.iter().map(|j| j.timestamp).max(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
