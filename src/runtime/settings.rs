//! Startup settings: the user's config when it loads and validates, the
//! built-in defaults otherwise.
//!
//! Logging is not up yet when settings load (its level and directory come
//! from them), so the reason for a fallback is printed to stderr and kept
//! for the log once it opens.

use tracing::warn;

use crate::config::Settings;

/// Settings the pad runs with, plus why the defaults replaced the user's
/// config, if they did.
pub struct LoadedSettings {
    pub settings: Settings,
    pub fallback: Option<String>,
}

impl LoadedSettings {
    /// Repeat the fallback reason into the log file.
    pub fn log_fallback(&self) {
        if let Some(reason) = &self.fallback {
            warn!(reason = %reason, "running with default settings");
        }
    }
}

pub fn load_settings() -> LoadedSettings {
    let loaded = resolve(Settings::load().map_err(|e| e.to_string()));
    if let Some(reason) = &loaded.fallback {
        eprintln!("soundpad: {reason}; using defaults");
    }
    loaded
}

/// A config that fails to parse or names no usable `library.extensions`
/// would leave the pad unable to list anything, so either falls back.
fn resolve(loaded: Result<Settings, String>) -> LoadedSettings {
    let fallback = match loaded {
        Ok(settings) => match settings.validate() {
            Ok(()) => {
                return LoadedSettings {
                    settings,
                    fallback: None,
                };
            }
            Err(msg) => format!("invalid config: {msg}"),
        },
        Err(e) => format!("failed to load config: {e}"),
    };
    LoadedSettings {
        settings: Settings::default(),
        fallback: Some(fallback),
    }
}
