//! # iptax-settings
//!
//! Configuration management with layered sources for the iptax tool.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`IptaxSettings::default()`]
//! 2. **User file** — `~/.config/iptax/settings.json` (deep-merged over
//!    defaults)
//! 3. **Environment variables** — `IPTAX_*` overrides (highest priority)
//!
//! The global singleton is reloadable: after a settings file edit,
//! [`reload_settings_from_path`] swaps the cached value so all subsequent
//! [`get_settings`] calls return fresh data.
//!
//! # Usage
//!
//! ```no_run
//! use iptax_settings::get_settings;
//!
//! let settings = get_settings();
//! println!("product: {}", settings.product.name);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod paths;
pub mod types;

pub use errors::SettingsError;
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use paths::{cache_dir, config_dir, judgment_cache_path, ledger_path};
pub use types::*;

use std::path::Path;
use std::sync::{Arc, RwLock};

/// Global settings singleton.
///
/// Uses `RwLock<Option<Arc<IptaxSettings>>>` instead of `OnceLock` so the
/// cached value can be swapped after a reload. Reads are cheap (shared lock
/// + `Arc::clone`), writes only happen on reload which is rare.
static SETTINGS: RwLock<Option<Arc<IptaxSettings>>> = RwLock::new(None);

/// Get the global settings instance.
///
/// On first call, loads settings from `~/.config/iptax/settings.json` with
/// env var overrides. On subsequent calls, returns the cached value. If
/// loading fails, returns compiled defaults.
///
/// Returns an `Arc` so callers can hold a consistent snapshot even if
/// another thread reloads settings concurrently.
pub fn get_settings() -> Arc<IptaxSettings> {
    // Fast path: read lock
    {
        let guard = SETTINGS.read().expect("settings lock poisoned");
        if let Some(ref s) = *guard {
            return Arc::clone(s);
        }
    }

    // Slow path: first access, take write lock
    let mut guard = SETTINGS.write().expect("settings lock poisoned");
    // Double-check after acquiring write lock (another thread may have initialized)
    if let Some(ref s) = *guard {
        return Arc::clone(s);
    }

    let settings = Arc::new(match load_settings() {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load settings, using defaults");
            IptaxSettings::default()
        }
    });
    *guard = Some(Arc::clone(&settings));
    settings
}

/// Initialize the global settings with a specific value.
///
/// Replaces any previously cached settings. Useful for tests and CLI
/// startup where the settings path is known.
pub fn init_settings(settings: IptaxSettings) {
    let mut guard = SETTINGS.write().expect("settings lock poisoned");
    *guard = Some(Arc::new(settings));
}

/// Reload settings from a specific file path.
///
/// Reads the file, deep-merges over defaults, applies env overrides,
/// and atomically swaps the global cache. All subsequent [`get_settings`]
/// calls return the new values.
pub fn reload_settings_from_path(path: &Path) {
    let new = Arc::new(match load_settings_from_path(path) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, ?path, "failed to reload settings, falling back to defaults");
            IptaxSettings::default()
        }
    });
    let mut guard = SETTINGS.write().expect("settings lock poisoned");
    *guard = Some(new);
    tracing::info!(?path, "settings reloaded from disk");
}

/// Reset the global settings cache (test-only).
///
/// Clears the cached value so the next [`get_settings`] call re-loads
/// from disk. This is needed because tests share a process and the
/// global is `static`.
#[cfg(test)]
pub(crate) fn reset_settings() {
    let mut guard = SETTINGS.write().expect("settings lock poisoned");
    *guard = None;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
