//! Intent routing for user utterances.
//!
//! Rule-based classification that works without any model: an ordered list of
//! [`IntentMatcher`]s is tried in priority order and the first one to claim the
//! utterance decides the intent. Routing is pure; the same utterance always
//! yields the same intent.

pub mod language;
pub mod matcher;

use serde::Serialize;

use crate::error::{EvalError, RouteError};

pub use language::language_code;
pub use matcher::{IntentMatcher, Utterance};

/// City used when a weather request names none.
pub const DEFAULT_CITY: &str = "Athens";

/// Text and target language code of a translate request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslateArgs {
    pub text: String,
    pub target_language: String,
}

/// Classified purpose of one utterance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Panic command: lock the system.
    Sos,
    /// Current weather for a city.
    Weather { city: String },
    /// Encyclopedia summary; `Err` when no topic was given.
    Lookup { topic: Result<String, RouteError> },
    /// Tell a joke.
    Joke,
    /// Translate text; `Err` when the request is malformed.
    Translate {
        request: Result<TranslateArgs, RouteError>,
    },
    /// Arithmetic that evaluated successfully.
    Math { expression: String, value: f64 },
    /// Nothing matched. `failure` is set when an expression was found but did
    /// not evaluate.
    Unknown {
        text: String,
        failure: Option<EvalError>,
    },
}

impl Intent {
    /// Stable tag name, for logs and the `route` command.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sos => "sos",
            Self::Weather { .. } => "weather",
            Self::Lookup { .. } => "lookup",
            Self::Joke => "joke",
            Self::Translate { .. } => "translate",
            Self::Math { .. } => "math",
            Self::Unknown { .. } => "unknown",
        }
    }
}

/// Ordered list of matchers.
pub struct IntentRouter {
    matchers: Vec<Box<dyn IntentMatcher>>,
}

impl IntentRouter {
    /// The standard rule set, in priority order.
    pub fn new(default_city: impl Into<String>) -> Self {
        Self::with_matchers(vec![
            Box::new(matcher::SosMatcher),
            Box::new(matcher::WeatherMatcher {
                default_city: default_city.into(),
            }),
            Box::new(matcher::LookupMatcher),
            Box::new(matcher::TranslateMatcher),
            Box::new(matcher::JokeMatcher),
            Box::new(matcher::MathMatcher),
        ])
    }

    /// Build a router from an explicit rule list.
    pub fn with_matchers(matchers: Vec<Box<dyn IntentMatcher>>) -> Self {
        Self { matchers }
    }

    /// Names of the rules, in the order they are tried.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    /// Classify an utterance.
    pub fn route(&self, utterance: &str) -> Intent {
        let utterance = Utterance::new(utterance);
        for m in &self.matchers {
            if let Some(intent) = m.claim(&utterance) {
                tracing::debug!(rule = m.name(), intent = intent.name(), "utterance routed");
                return intent;
            }
        }
        Intent::Unknown {
            text: utterance.text,
            failure: None,
        }
    }
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new(DEFAULT_CITY)
    }
}

/// Classify an utterance with the standard rules and default city.
pub fn route(utterance: &str) -> Intent {
    IntentRouter::default().route(utterance)
}
