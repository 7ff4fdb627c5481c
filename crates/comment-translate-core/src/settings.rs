//! User-facing translation settings.

use serde::{Deserialize, Serialize};

/// Default target language code.
pub const DEFAULT_TARGET_LANGUAGE: &str = "en";

/// Process-wide translation settings.
///
/// # Defaults
///
/// - `multi_line_merge`: `false`
/// - `concise`: `false`
/// - `target_language`: `"en"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Join comment lines that continue one sentence with a space.
    pub multi_line_merge: bool,
    /// Only answer hovers that follow a go-to-definition, translating
    /// whatever token is under the cursor.
    pub concise: bool,
    /// Target language code (e.g. `"en"`, `"zh-CN"`).
    #[serde(alias = "preferredLanguage")]
    pub target_language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            multi_line_merge: false,
            concise: false,
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
        }
    }
}

/// Partial settings update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub multi_line_merge: Option<bool>,
    pub concise: Option<bool>,
    #[serde(alias = "preferredLanguage")]
    pub target_language: Option<String>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.multi_line_merge.is_none() && self.concise.is_none() && self.target_language.is_none()
    }
}

impl Settings {
    /// Applies `patch` in place. An empty target language is ignored.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(merge) = patch.multi_line_merge {
            self.multi_line_merge = merge;
        }
        if let Some(concise) = patch.concise {
            self.concise = concise;
        }
        if let Some(language) = patch.target_language.filter(|l| !l.trim().is_empty()) {
            self.target_language = language.trim().to_string();
        }
    }
}
