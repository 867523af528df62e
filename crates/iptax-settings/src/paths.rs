//! Environment-aware path resolution.
//!
//! Resolves the application's config and cache directories per the XDG Base
//! Directory specification, falling back to `~/.config/iptax` and
//! `~/.cache/iptax`. Relative values in the XDG variables violate the spec
//! and are ignored with a warning.

use std::path::{Path, PathBuf};

/// The user's home directory, from `HOME`.
#[must_use]
pub fn home_dir() -> PathBuf {
    std::env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from)
}

/// Resolve an application directory from an XDG variable value and a home
/// directory. Split out from the env lookups so it is testable without
/// mutating process state.
fn resolve_app_dir(xdg_value: Option<PathBuf>, home: &Path, fallback_subdir: &str) -> PathBuf {
    if let Some(path) = xdg_value {
        if path.is_absolute() {
            return path.join("iptax");
        }
        tracing::warn!(
            path = %path.display(),
            "relative XDG path violates the base-directory spec; using default"
        );
    }
    home.join(fallback_subdir).join("iptax")
}

/// The iptax configuration directory (`XDG_CONFIG_HOME` or `~/.config`).
#[must_use]
pub fn config_dir() -> PathBuf {
    resolve_app_dir(
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        &home_dir(),
        ".config",
    )
}

/// The iptax cache directory (`XDG_CACHE_HOME` or `~/.cache`).
#[must_use]
pub fn cache_dir() -> PathBuf {
    resolve_app_dir(
        std::env::var_os("XDG_CACHE_HOME").map(PathBuf::from),
        &home_dir(),
        ".cache",
    )
}

/// Default location of the judgment cache file.
#[must_use]
pub fn judgment_cache_path() -> PathBuf {
    cache_dir().join("ai_cache.json")
}

/// Default location of the period ledger file.
#[must_use]
pub fn ledger_path() -> PathBuf {
    cache_dir().join("history.json")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_xdg_value_wins() {
        let dir = resolve_app_dir(
            Some(PathBuf::from("/tmp/xdg-cache")),
            Path::new("/home/worker"),
            ".cache",
        );
        assert_eq!(dir, PathBuf::from("/tmp/xdg-cache/iptax"));
    }

    #[test]
    fn relative_xdg_value_is_ignored() {
        let dir = resolve_app_dir(
            Some(PathBuf::from("relative/path")),
            Path::new("/home/worker"),
            ".cache",
        );
        assert_eq!(dir, PathBuf::from("/home/worker/.cache/iptax"));
    }

    #[test]
    fn missing_xdg_value_falls_back_to_home() {
        let dir = resolve_app_dir(None, Path::new("/home/worker"), ".config");
        assert_eq!(dir, PathBuf::from("/home/worker/.config/iptax"));
    }

    #[test]
    fn store_paths_live_under_cache_dir() {
        assert_eq!(
            judgment_cache_path().file_name().unwrap(),
            "ai_cache.json"
        );
        assert_eq!(ledger_path().file_name().unwrap(), "history.json");
        assert_eq!(judgment_cache_path().parent(), ledger_path().parent());
    }
}
