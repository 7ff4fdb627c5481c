//! Free-text translation requests.

use crate::document::ServerState;
use crate::protocol::{TranslateSelectionParams, TranslateSelectionResult};
use comment_translate_core::{CoreError, Result, Settings, humanize, to_identifier};

/// Translates `text` into the configured target language.
pub async fn handle_translate(state: &ServerState, text: &str, settings: &Settings) -> Result<String> {
    state
        .translator()
        .translate(text, &settings.target_language)
        .await
}

/// Translates a selection for in-place replacement.
///
/// If the provider hands the text back unchanged it is most likely an
/// identifier the provider could not split; the selection is humanized,
/// translated again and re-cased as lower camel case. The language used is
/// promoted in the recently used list on success.
pub async fn handle_translate_selection(
    state: &ServerState,
    params: TranslateSelectionParams,
    settings: &Settings,
) -> Result<TranslateSelectionResult> {
    let target_language = params
        .target_language
        .filter(|language| !language.trim().is_empty())
        .unwrap_or_else(|| settings.target_language.clone());
    let translator = state.translator();

    let translation = if params.humanize {
        let translated = translator
            .translate(&humanize(&params.text), &target_language)
            .await?;
        to_identifier(&translated)
    } else {
        let translated = translator.translate(&params.text, &target_language).await?;
        if translated.trim() == params.text.trim() {
            tracing::debug!("provider echoed selection, retrying as identifier");
            let humanized = humanize(&params.text);
            if humanized.is_empty() {
                return Err(CoreError::EmptyText);
            }
            let retried = translator.translate(&humanized, &target_language).await?;
            to_identifier(&retried)
        } else {
            translated
        }
    };

    state.promote_language(&target_language);
    Ok(TranslateSelectionResult {
        translation,
        target_language,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use comment_translate_core::Translator;
    use std::sync::Arc;

    /// Knows a handful of phrases, echoes everything else.
    struct Dictionary;

    #[async_trait]
    impl Translator for Dictionary {
        async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
            let translated = match (text, target_language) {
                ("hello world", "de") => "hallo welt",
                ("get user name", "de") => "benutzernamen abrufen",
                ("get user name", "fr") => "obtenir le nom",
                _ => text,
            };
            Ok(translated.to_string())
        }
    }

    fn state() -> ServerState {
        ServerState::with_translator(Arc::new(Dictionary))
    }

    fn german() -> Settings {
        Settings {
            target_language: "de".into(),
            ..Settings::default()
        }
    }

    fn params(text: &str) -> TranslateSelectionParams {
        TranslateSelectionParams {
            text: text.into(),
            target_language: None,
            humanize: false,
        }
    }

    #[tokio::test]
    async fn test_translate_uses_settings_language() {
        let translated = handle_translate(&state(), "hello world", &german()).await.unwrap();
        assert_eq!(translated, "hallo welt");
    }

    #[tokio::test]
    async fn test_selection_plain_text() {
        let state = state();
        let result = handle_translate_selection(&state, params("hello world"), &german())
            .await
            .unwrap();
        assert_eq!(result.translation, "hallo welt");
        assert_eq!(result.target_language, "de");
        assert_eq!(state.recent_languages(), vec!["de"]);
    }

    #[tokio::test]
    async fn test_selection_echo_retries_as_identifier() {
        let result = handle_translate_selection(&state(), params("getUserName"), &german())
            .await
            .unwrap();
        assert_eq!(result.translation, "benutzernamenAbrufen");
    }

    #[tokio::test]
    async fn test_selection_explicit_humanize_and_language() {
        let state = state();
        let request = TranslateSelectionParams {
            text: "get_user_name".into(),
            target_language: Some("fr".into()),
            humanize: true,
        };
        let result = handle_translate_selection(&state, request, &german()).await.unwrap();
        assert_eq!(result.translation, "obtenirLeNom");
        assert_eq!(result.target_language, "fr");
        assert_eq!(state.recent_languages(), vec!["fr"]);
    }

    #[tokio::test]
    async fn test_selection_failure_leaves_recent_untouched() {
        struct Broken;

        #[async_trait]
        impl Translator for Broken {
            async fn translate(&self, _: &str, _: &str) -> Result<String> {
                Err(CoreError::Http("down".into()))
            }
        }

        let state = ServerState::with_translator(Arc::new(Broken));
        let err = handle_translate_selection(&state, params("x"), &german())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Http(_)));
        assert!(state.recent_languages().is_empty());
    }
}
