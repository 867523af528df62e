//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`IptaxSettings::default()`]
//! 2. If `~/.config/iptax/settings.json` exists, deep-merge user values over
//!    defaults
//! 3. Apply `IPTAX_*` environment variable overrides (highest priority)
//! 4. Validate the result
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::SettingsError;
use crate::paths::config_dir;
use crate::types::IptaxSettings;

/// Resolve the path to the settings file (`~/.config/iptax/settings.json`).
#[must_use]
pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<IptaxSettings, SettingsError> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON or fails validation, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<IptaxSettings, SettingsError> {
    let defaults = serde_json::to_value(IptaxSettings::default()).map_err(|source| {
        SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let user: Value =
            serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: IptaxSettings =
        serde_json::from_value(merged).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
#[must_use]
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Each env var has strict parsing rules; invalid values are logged and
/// ignored (falling back to file/default).
pub fn apply_env_overrides(settings: &mut IptaxSettings) {
    if let Some(v) = read_env_string("IPTAX_PRODUCT") {
        settings.product.name = v;
    }
    if let Some(v) = read_env_string("IPTAX_AI_PROVIDER") {
        settings.ai.provider = v;
    }
    if let Some(v) = read_env_string("IPTAX_AI_MODEL") {
        settings.ai.model = v;
    }
    if let Some(v) = read_env_usize("IPTAX_MAX_LEARNINGS", 0, 100) {
        settings.ai.max_learnings = v;
    }
    if let Some(v) = read_env_f64("IPTAX_CORRECTION_RATIO", 0.0, 1.0) {
        settings.ai.correction_ratio = v;
    }
    if let Some(v) = read_env_i64("IPTAX_SPAN_WARN_DAYS", 1, 366) {
        settings.history.span_warn_days = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `usize` within a range.
#[must_use]
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as an `i64` within a range.
#[must_use]
pub fn parse_i64_range(val: &str, min: i64, max: i64) -> Option<i64> {
    let n: i64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as an `f64` within a range.
#[must_use]
pub fn parse_f64_range(val: &str, min: f64, max: f64) -> Option<f64> {
    let n: f64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_usize(name: &str, min: usize, max: usize) -> Option<usize> {
    let val = std::env::var(name).ok()?;
    let result = parse_usize_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid integer env var, ignoring");
    }
    result
}

fn read_env_i64(name: &str, min: i64, max: i64) -> Option<i64> {
    let val = std::env::var(name).ok()?;
    let result = parse_i64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid integer env var, ignoring");
    }
    result
}

fn read_env_f64(name: &str, min: f64, max: f64) -> Option<f64> {
    let val = std::env::var(name).ok()?;
    let result = parse_f64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid float env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_simple_override() {
        let target = serde_json::json!({"a": 1, "b": 2});
        let source = serde_json::json!({"a": 10});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 10);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_nested_override() {
        let target = serde_json::json!({
            "ai": {"maxLearnings": 20, "correctionRatio": 0.75}
        });
        let source = serde_json::json!({
            "ai": {"maxLearnings": 10}
        });
        let merged = deep_merge(target, source);
        assert_eq!(merged["ai"]["maxLearnings"], 10);
        assert_eq!(merged["ai"]["correctionRatio"], 0.75);
    }

    #[test]
    fn merge_array_replace() {
        let target = serde_json::json!({"items": [1, 2, 3]});
        let source = serde_json::json!({"items": [4, 5]});
        let merged = deep_merge(target, source);
        assert_eq!(merged["items"], serde_json::json!([4, 5]));
    }

    #[test]
    fn merge_null_preserves_target() {
        let target = serde_json::json!({"a": 1, "b": 2});
        let source = serde_json::json!({"a": null});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_new_keys_added() {
        let target = serde_json::json!({"a": 1});
        let source = serde_json::json!({"b": 2});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_primitive_replaces_object() {
        let target = serde_json::json!({"a": {"nested": true}});
        let source = serde_json::json!({"a": 42});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 42);
    }

    // ── load_settings_from_path ─────────────────────────────────────

    #[test]
    fn load_missing_file_returns_defaults() {
        let path = Path::new("/nonexistent/settings.json");
        let settings = load_settings_from_path(path).unwrap();
        let defaults = IptaxSettings::default();
        assert_eq!(settings.version, defaults.version);
        assert_eq!(settings.ai.max_learnings, defaults.ai.max_learnings);
    }

    #[test]
    fn load_empty_json_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{}").unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings, IptaxSettings::default());
    }

    #[test]
    fn load_partial_json_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"product": {"name": "fungear"}, "ai": {"maxLearnings": 10}}"#,
        )
        .unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.product.name, "fungear");
        assert_eq!(settings.ai.max_learnings, 10);
        assert_eq!(settings.ai.correction_ratio, 0.75);
        assert_eq!(settings.history.span_warn_days, 31);
    }

    #[test]
    fn load_invalid_json_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not valid json").unwrap();

        let result = load_settings_from_path(&path);
        assert!(matches!(result, Err(SettingsError::Parse { .. })));
    }

    #[test]
    fn load_rejects_out_of_range_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"ai": {"correctionRatio": 2.0}}"#).unwrap();

        let result = load_settings_from_path(&path);
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    // ── parse helpers ───────────────────────────────────────────────

    #[test]
    fn parse_usize_valid() {
        assert_eq!(parse_usize_range("20", 0, 100), Some(20));
        assert_eq!(parse_usize_range("0", 0, 100), Some(0));
        assert_eq!(parse_usize_range("100", 0, 100), Some(100));
    }

    #[test]
    fn parse_usize_invalid() {
        assert_eq!(parse_usize_range("101", 0, 100), None);
        assert_eq!(parse_usize_range("not_a_number", 0, 100), None);
        assert_eq!(parse_usize_range("", 0, 100), None);
    }

    #[test]
    fn parse_i64_valid_and_invalid() {
        assert_eq!(parse_i64_range("31", 1, 366), Some(31));
        assert_eq!(parse_i64_range("0", 1, 366), None);
        assert_eq!(parse_i64_range("400", 1, 366), None);
    }

    #[test]
    fn parse_f64_valid_and_invalid() {
        assert_eq!(parse_f64_range("0.75", 0.0, 1.0), Some(0.75));
        assert_eq!(parse_f64_range("1.0", 0.0, 1.0), Some(1.0));
        assert_eq!(parse_f64_range("1.5", 0.0, 1.0), None);
        assert_eq!(parse_f64_range("abc", 0.0, 1.0), None);
    }
}
