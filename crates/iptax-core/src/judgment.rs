//! Relevance judgments for external changes.
//!
//! A [`Judgment`] records one relevance decision for a single change
//! (a merged PR/MR identified by a stable `change_id`). It carries the
//! automated decision and, once a human has reviewed the change, the user's
//! final word. The delta between the two is the learning signal the history
//! selector over-represents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Decisions
// ─────────────────────────────────────────────────────────────────────────────

/// Automated relevance decision for a change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    /// The change directly contributes to the product.
    Include,
    /// The change is unrelated to the product.
    Exclude,
    /// Relevance could not be determined with confidence.
    Uncertain,
}

/// A human reviewer's decision.
///
/// Reviewers must commit to a side — there is no `Uncertain` here, so an
/// unresolved review state is unrepresentable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserDecision {
    /// Count the change in the report.
    Include,
    /// Leave the change out.
    Exclude,
}

impl UserDecision {
    /// The equivalent automated-decision value, for comparisons.
    #[must_use]
    pub fn as_decision(self) -> Decision {
        match self {
            Self::Include => Decision::Include,
            Self::Exclude => Decision::Exclude,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Judgment
// ─────────────────────────────────────────────────────────────────────────────

/// One relevance decision for a single external change.
///
/// Created when the automated judgment is produced; mutated exactly once
/// when a human reviews it. Identity is the `change_id` — re-judging the
/// same id overwrites rather than duplicates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Judgment {
    /// Stable unique key, e.g. `"github.com/owner/repo#123"`.
    pub change_id: String,
    /// Full PR/MR URL.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    /// Full PR/MR description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// The automated judgment.
    pub decision: Decision,
    /// Free text explaining `decision`.
    pub reasoning: String,
    /// The reviewer's final decision, absent while unreviewed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_decision: Option<UserDecision>,
    /// The reviewer's reasoning, present only on explicit override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_reasoning: Option<String>,
    /// Product scope this judgment was made under.
    pub product: String,
    /// When the judgment was recorded (UTC).
    pub timestamp: DateTime<Utc>,
    /// Provider and model that produced the decision,
    /// e.g. `"gemini/gemini-2.5-pro"`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ai_provider: String,
}

impl Judgment {
    /// The decision that counts: the user's if present, otherwise the
    /// automated one.
    #[must_use]
    pub fn final_decision(&self) -> Decision {
        self.user_decision
            .map_or(self.decision, UserDecision::as_decision)
    }

    /// Whether a reviewer changed the outcome.
    ///
    /// True exactly when a user decision is present and differs from the
    /// automated decision — the signal that teaches the judge what it got
    /// wrong.
    #[must_use]
    pub fn was_corrected(&self) -> bool {
        self.final_decision() != self.decision
    }
}

/// Merge an incoming judgment over an existing one for the same change.
///
/// Full replacement, except that a previously recorded user decision (and
/// its reasoning) survives unless the incoming record explicitly supplies a
/// user decision of its own. Re-judging a change must not erase a prior
/// human correction.
#[must_use]
pub fn merge_judgment(existing: Option<&Judgment>, mut incoming: Judgment) -> Judgment {
    if let Some(prev) = existing {
        if incoming.user_decision.is_none() {
            incoming.user_decision = prev.user_decision;
            incoming.user_reasoning = prev.user_reasoning.clone();
        }
    }
    incoming
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn judgment(change_id: &str, decision: Decision) -> Judgment {
        Judgment {
            change_id: change_id.to_string(),
            url: String::new(),
            description: String::new(),
            decision,
            reasoning: "automated".to_string(),
            user_decision: None,
            user_reasoning: None,
            product: "fungear".to_string(),
            timestamp: "2024-11-01T12:00:00Z".parse().unwrap(),
            ai_provider: String::new(),
        }
    }

    #[test]
    fn final_decision_prefers_user() {
        let mut j = judgment("a#1", Decision::Exclude);
        assert_eq!(j.final_decision(), Decision::Exclude);
        j.user_decision = Some(UserDecision::Include);
        assert_eq!(j.final_decision(), Decision::Include);
    }

    #[test]
    fn was_corrected_requires_differing_user_decision() {
        let mut j = judgment("a#1", Decision::Include);
        assert!(!j.was_corrected());

        j.user_decision = Some(UserDecision::Include);
        assert!(!j.was_corrected(), "confirmation is not a correction");

        j.user_decision = Some(UserDecision::Exclude);
        assert!(j.was_corrected());
    }

    #[test]
    fn resolving_uncertain_counts_as_correction() {
        let mut j = judgment("a#1", Decision::Uncertain);
        j.user_decision = Some(UserDecision::Include);
        assert!(j.was_corrected());
    }

    #[test]
    fn merge_preserves_prior_override() {
        let mut reviewed = judgment("a#1", Decision::Include);
        reviewed.user_decision = Some(UserDecision::Exclude);
        reviewed.user_reasoning = Some("internal tooling only".to_string());

        let rejudged = judgment("a#1", Decision::Include);
        let merged = merge_judgment(Some(&reviewed), rejudged);
        assert_eq!(merged.user_decision, Some(UserDecision::Exclude));
        assert_eq!(
            merged.user_reasoning.as_deref(),
            Some("internal tooling only")
        );
    }

    #[test]
    fn merge_lets_explicit_user_decision_win() {
        let mut reviewed = judgment("a#1", Decision::Include);
        reviewed.user_decision = Some(UserDecision::Exclude);

        let mut incoming = judgment("a#1", Decision::Include);
        incoming.user_decision = Some(UserDecision::Include);
        incoming.user_reasoning = None;

        let merged = merge_judgment(Some(&reviewed), incoming);
        assert_eq!(merged.user_decision, Some(UserDecision::Include));
        assert_eq!(merged.user_reasoning, None);
    }

    #[test]
    fn merge_without_existing_is_identity() {
        let j = judgment("a#1", Decision::Uncertain);
        let merged = merge_judgment(None, j.clone());
        assert_eq!(merged, j);
    }

    #[test]
    fn serde_roundtrip_with_optionals_omitted() {
        let j = judgment("github.com/owner/repo#123", Decision::Include);
        let json = serde_json::to_value(&j).unwrap();
        assert_eq!(json["changeId"], "github.com/owner/repo#123");
        assert_eq!(json["decision"], "INCLUDE");
        assert!(json.get("userDecision").is_none());
        assert!(json.get("url").is_none());

        let back: Judgment = serde_json::from_value(json).unwrap();
        assert_eq!(back, j);
    }
}
