//! Translation through Google's public `gtx` endpoint.
//!
//! The response is a nested JSON array; the first element lists translated
//! segments as `[translated, original, ...]`.

use super::{ProviderResult, TranslationProvider, error_body, http_agent};
use crate::error::ProviderError;

const PROVIDER: &str = "translation";

/// Client for `{base}/translate_a/single`.
pub struct GoogleTranslateClient {
    agent: ureq::Agent,
    endpoint: String,
}

impl GoogleTranslateClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let base: String = base_url.into();
        Self {
            agent: http_agent(timeout_secs),
            endpoint: format!("{}/translate_a/single", base.trim_end_matches('/')),
        }
    }
}

impl TranslationProvider for GoogleTranslateClient {
    fn translate(&self, text: &str, target_language: &str) -> ProviderResult<String> {
        let response = self
            .agent
            .get(&self.endpoint)
            .query("client", "gtx")
            .query("sl", "auto")
            .query("tl", target_language)
            .query("dt", "t")
            .query("q", text)
            .call();

        let value: serde_json::Value = match response {
            Ok(resp) => resp
                .into_json()
                .map_err(|e| ProviderError::unavailable(PROVIDER, e))?,
            Err(ureq::Error::Status(code, resp)) => {
                let body = error_body(resp);
                tracing::warn!(code, target_language, body = %body, "translation rejected");
                return Err(ProviderError::unavailable(
                    PROVIDER,
                    format!("HTTP {code} for target language \"{target_language}\""),
                ));
            }
            Err(ureq::Error::Transport(t)) => {
                tracing::warn!(error = %t, "translation transport error");
                return Err(ProviderError::unavailable(PROVIDER, t));
            }
        };

        join_segments(&value)
            .ok_or_else(|| ProviderError::unavailable(PROVIDER, "unexpected response shape"))
    }
}

/// Concatenate the translated segments of a `gtx` response.
pub fn join_segments(value: &serde_json::Value) -> Option<String> {
    let segments = value.get(0)?.as_array()?;
    let joined: String = segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(|s| s.as_str()))
        .collect();
    if joined.trim().is_empty() {
        None
    } else {
        Some(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn joins_multiple_segments() {
        let value = json!([[["Hola. ", "Hello. ", null], ["¿Cómo estás?", "How are you?", null]], null, "en"]);
        assert_eq!(join_segments(&value).as_deref(), Some("Hola. ¿Cómo estás?"));
    }

    #[test]
    fn rejects_unexpected_shapes() {
        assert_eq!(join_segments(&json!({"error": "bad"})), None);
        assert_eq!(join_segments(&json!([[]])), None);
    }
}
