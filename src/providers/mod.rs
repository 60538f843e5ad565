//! External collaborators: weather, encyclopedia, translation, jokes.
//!
//! Each remote service sits behind a small trait so the assistant can be driven
//! by fakes in tests. The concrete clients use `ureq` for synchronous HTTP with
//! a per-request timeout.

pub mod joke;
pub mod translate;
pub mod weather;
pub mod wiki;

use std::time::Duration;

use crate::error::ProviderError;

pub use joke::JokeBook;
pub use translate::GoogleTranslateClient;
pub use weather::{WeatherApiClient, WeatherReport};
pub use wiki::WikipediaClient;

/// Convenience alias for provider results.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Current conditions for a city.
pub trait WeatherProvider {
    fn current(&self, city: &str) -> ProviderResult<WeatherReport>;
}

/// Short encyclopedia summaries.
pub trait EncyclopediaProvider {
    /// One or two sentences about `topic`.
    ///
    /// Disambiguation pages yield [`ProviderError::Ambiguous`] with up to five
    /// candidate titles.
    fn summary(&self, topic: &str) -> ProviderResult<String>;
}

/// Machine translation.
pub trait TranslationProvider {
    fn translate(&self, text: &str, target_language: &str) -> ProviderResult<String>;
}

/// Build a `ureq` agent with the given timeout.
pub(crate) fn http_agent(timeout_secs: u64) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("gideon/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Read the body of a non-2xx response, capped for log output.
pub(crate) fn error_body(response: ureq::Response) -> String {
    let body = response.into_string().unwrap_or_default();
    if body.len() > 500 {
        let mut end = 500;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body
    }
}
