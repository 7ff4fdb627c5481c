//! Google Translate client using the public `translate_a/single` endpoint.

use crate::error::{CoreError, Result};
use crate::translator::Translator;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

pub const GOOGLE_TRANSLATE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("comment-translate/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct GoogleTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslator {
    /// Creates a client talking to `endpoint` instead of Google.
    pub fn with_endpoint(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    fn request_url(&self, text: &str, target_language: &str) -> String {
        format!(
            "{}?client=gtx&sl=auto&tl={}&dt=t&ie=UTF-8&oe=UTF-8&q={}",
            self.endpoint,
            urlencoding::encode(&normalize_language_code(target_language)),
            urlencoding::encode(text),
        )
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        let url = self.request_url(text, target_language);
        tracing::debug!("translating {} bytes into {}", text.len(), target_language);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Http(format!("provider returned HTTP {status}")));
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

/// Extracts the translated sentences from a `translate_a/single` body.
///
/// The body is a nested array whose first element lists
/// `[translated, original, ...]` sentence pairs.
pub fn parse_response(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body)?;
    let sentences = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| CoreError::InvalidResponse("missing sentence list".into()))?;

    let translated: String = sentences
        .iter()
        .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
        .collect();

    Ok(collapse_marker_spaces(&translated))
}

/// Removes the space the provider inserts after `/`, `*` and `-`.
pub fn collapse_marker_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        out.push(c);
        if matches!(c, '/' | '*' | '-') && chars.peek() == Some(&' ') {
            chars.next();
        }
    }

    out
}

/// Upper-cases the region part of a language code (`zh-cn` -> `zh-CN`).
pub fn normalize_language_code(code: &str) -> String {
    match code.split_once('-') {
        Some((language, region)) if !region.is_empty() => {
            format!("{}-{}", language, region.to_uppercase())
        }
        _ => code.to_string(),
    }
}

/// Markdown link opening the translation in the Google Translate web UI.
pub fn translation_link(text: &str, target_language: &str) -> String {
    format!(
        "[Google](https://translate.google.com/?sl=auto&tl={}&text={}&op=translate)",
        urlencoding::encode(&normalize_language_code(target_language)),
        urlencoding::encode(text),
    )
}
