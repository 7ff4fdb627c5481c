//! Server configuration.
//!
//! Read from `initializationOptions` at startup. Translation settings can
//! later be replaced through `workspace/didChangeConfiguration` or pulled
//! with `workspace/configuration` under the [`SETTINGS_SECTION`] section.

use comment_translate_core::google::{DEFAULT_TIMEOUT, GOOGLE_TRANSLATE_ENDPOINT};
use comment_translate_core::translator::{DEFAULT_COOLDOWN, DEFAULT_MAX_CACHE_ENTRIES};
use comment_translate_core::{Settings, SettingsPatch};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Configuration section queried from the client.
pub const SETTINGS_SECTION: &str = "commentTranslate";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub settings: Settings,
    pub translator: TranslatorConfig,
}

/// Translation provider options.
///
/// # Defaults
///
/// - `endpoint`: Google `translate_a/single`
/// - `timeout_ms`: 10000
/// - `cooldown_secs`: 300
/// - `max_cache_entries`: 1024
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslatorConfig {
    pub endpoint: String,
    pub timeout_ms: u64,
    pub cooldown_secs: u64,
    pub max_cache_entries: usize,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            endpoint: GOOGLE_TRANSLATE_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            cooldown_secs: DEFAULT_COOLDOWN.as_secs(),
            max_cache_entries: DEFAULT_MAX_CACHE_ENTRIES,
        }
    }
}

impl TranslatorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

/// Extracts a settings patch from a configuration payload.
///
/// Accepts either the bare settings object or one nested under
/// [`SETTINGS_SECTION`] (the shape `didChangeConfiguration` usually carries).
/// Returns `None` when nothing recognizable is present.
pub fn settings_patch_from_value(value: &Value) -> Option<SettingsPatch> {
    let section = value.get(SETTINGS_SECTION).unwrap_or(value);
    if !section.is_object() {
        return None;
    }

    match serde_json::from_value::<SettingsPatch>(section.clone()) {
        Ok(patch) if !patch.is_empty() => Some(patch),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("ignoring malformed settings: {}", e);
            None
        }
    }
}
