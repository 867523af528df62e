//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and implement
//! [`Default`] with production default values. `#[serde(default)]` allows
//! partial JSON — missing fields get their default value during
//! deserialization, so a user file only needs to spell out what it changes.

use serde::{Deserialize, Serialize};

use crate::errors::SettingsError;

/// Root settings type for the iptax tool.
///
/// Loaded from `~/.config/iptax/settings.json`, deep-merged over compiled
/// defaults, with `IPTAX_*` environment variables applied last.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IptaxSettings {
    /// Settings schema version.
    pub version: String,
    /// Who the reports are for.
    pub employee: EmployeeSettings,
    /// The product scope used for relevance judgments.
    pub product: ProductSettings,
    /// Report output settings.
    pub report: ReportSettings,
    /// Automated-judge tuning.
    pub ai: AiSettings,
    /// Period-ledger tuning.
    pub history: HistorySettings,
}

impl Default for IptaxSettings {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            employee: EmployeeSettings::default(),
            product: ProductSettings::default(),
            report: ReportSettings::default(),
            ai: AiSettings::default(),
            history: HistorySettings::default(),
        }
    }
}

impl IptaxSettings {
    /// Validate cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=1.0).contains(&self.ai.correction_ratio) {
            return Err(SettingsError::Invalid(format!(
                "ai.correctionRatio must be between 0.0 and 1.0, got {}",
                self.ai.correction_ratio
            )));
        }
        if self.ai.max_learnings > 100 {
            return Err(SettingsError::Invalid(format!(
                "ai.maxLearnings must be at most 100, got {}",
                self.ai.max_learnings
            )));
        }
        // 0% creative work defeats the purpose of the report.
        if !(1..=100).contains(&self.report.creative_work_percentage) {
            return Err(SettingsError::Invalid(format!(
                "report.creativeWorkPercentage must be between 1 and 100, got {}",
                self.report.creative_work_percentage
            )));
        }
        Ok(())
    }
}

/// Employee details printed on generated reports.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeSettings {
    /// Full name of the employee.
    pub name: String,
    /// Full name of the employee's supervisor.
    pub supervisor: String,
}

/// Product scope for relevance filtering.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductSettings {
    /// Product name the judgments are scoped to.
    pub name: String,
}

/// Report generation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportSettings {
    /// Output directory template; `{year}` is replaced with the report year.
    pub output_dir: String,
    /// Percentage of work counted as creative, `1..=100`.
    pub creative_work_percentage: u8,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output_dir: "~/Documents/iptax/{year}/".to_string(),
            creative_work_percentage: 80,
        }
    }
}

/// Automated-judge settings that feed the history selector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiSettings {
    /// Provider identifier, `"disabled"` when no judge is configured.
    pub provider: String,
    /// Model name used by the provider.
    pub model: String,
    /// Maximum number of learning entries injected into the prompt.
    pub max_learnings: usize,
    /// Target fraction of learning slots given to corrections, `0.0..=1.0`.
    pub correction_ratio: f64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            provider: "disabled".to_string(),
            model: "gemini-2.5-pro".to_string(),
            max_learnings: 20,
            correction_ratio: 0.75,
        }
    }
}

/// Period-ledger and date-range settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistorySettings {
    /// Warn when a collection window spans more than this many days.
    pub span_warn_days: i64,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { span_warn_days: 31 }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = IptaxSettings::default();
        settings.validate().unwrap();
        assert_eq!(settings.ai.max_learnings, 20);
        assert_eq!(settings.ai.correction_ratio, 0.75);
        assert_eq!(settings.history.span_warn_days, 31);
        assert_eq!(settings.report.creative_work_percentage, 80);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: IptaxSettings =
            serde_json::from_str(r#"{"product": {"name": "fungear"}}"#).unwrap();
        assert_eq!(settings.product.name, "fungear");
        assert_eq!(settings.ai.max_learnings, 20);
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut settings = IptaxSettings::default();
        settings.ai.correction_ratio = 1.5;
        assert!(settings.validate().is_err());

        let mut settings = IptaxSettings::default();
        settings.ai.max_learnings = 500;
        assert!(settings.validate().is_err());

        let mut settings = IptaxSettings::default();
        settings.report.creative_work_percentage = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn serde_uses_camel_case() {
        let json = serde_json::to_value(IptaxSettings::default()).unwrap();
        assert!(json["ai"]["maxLearnings"].is_number());
        assert!(json["ai"]["correctionRatio"].is_number());
        assert!(json["history"]["spanWarnDays"].is_number());
        assert!(json["report"]["creativeWorkPercentage"].is_number());
    }
}
