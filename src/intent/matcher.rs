//! Declarative intent matchers.
//!
//! Each matcher inspects an [`Utterance`] and either claims it by producing an
//! [`Intent`] or declines. The router tries them in order; first claim wins.

use std::sync::LazyLock;

use regex::Regex;

use super::language::language_code;
use super::{Intent, TranslateArgs};
use crate::error::RouteError;
use crate::math;

static RE_WEATHER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bweather\b").unwrap());
static RE_WEATHER_STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bweather\b(\s+in\b)?").unwrap());
static RE_LOOKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^(wiki|search|who\s+is|what\s+is)\b(.*)$").unwrap()
});
static RE_TRANSLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^translate\b(.*)$").unwrap());
static RE_TO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bto\b").unwrap());
static RE_JOKE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bjokes?\b").unwrap());

pub const LOOKUP_USAGE: &str = "wiki <topic>";
pub const TRANSLATE_USAGE: &str = "translate <text> to <language>";

/// One user utterance, trimmed, with a lower-cased copy for matching.
#[derive(Debug, Clone)]
pub struct Utterance {
    pub text: String,
    pub lower: String,
}

impl Utterance {
    pub fn new(raw: &str) -> Self {
        let text = raw.trim().to_string();
        let lower = text.to_lowercase();
        Self { text, lower }
    }
}

/// A single routing rule.
pub trait IntentMatcher: Send + Sync {
    /// Short rule name for logs.
    fn name(&self) -> &'static str;

    /// Claim the utterance, or return `None` to let the next rule try.
    fn claim(&self, utterance: &Utterance) -> Option<Intent>;
}

/// Exact `sos`.
pub struct SosMatcher;

impl IntentMatcher for SosMatcher {
    fn name(&self) -> &'static str {
        "sos"
    }

    fn claim(&self, utterance: &Utterance) -> Option<Intent> {
        (utterance.lower == "sos").then_some(Intent::Sos)
    }
}

/// Any utterance mentioning the weather.
pub struct WeatherMatcher {
    pub default_city: String,
}

impl IntentMatcher for WeatherMatcher {
    fn name(&self) -> &'static str {
        "weather"
    }

    fn claim(&self, utterance: &Utterance) -> Option<Intent> {
        if !RE_WEATHER.is_match(&utterance.text) {
            return None;
        }
        let stripped = RE_WEATHER_STRIP.replace_all(&utterance.text, " ");
        let city = collapse_whitespace(trim_punctuation(&stripped));
        let city = if city.is_empty() {
            self.default_city.clone()
        } else {
            city
        };
        Some(Intent::Weather { city })
    }
}

/// `wiki X`, `search X`, `who is X`, `what is X`.
pub struct LookupMatcher;

impl IntentMatcher for LookupMatcher {
    fn name(&self) -> &'static str {
        "lookup"
    }

    fn claim(&self, utterance: &Utterance) -> Option<Intent> {
        let caps = RE_LOOKUP.captures(&utterance.text)?;
        let rest = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        let topic = collapse_whitespace(trim_punctuation(rest));

        if topic.is_empty() {
            return Some(Intent::Lookup {
                topic: Err(RouteError::MissingArgument {
                    intent: "lookup",
                    usage: LOOKUP_USAGE,
                }),
            });
        }
        Some(Intent::Lookup { topic: Ok(topic) })
    }
}

/// `translate <text> to <language>`.
pub struct TranslateMatcher;

impl IntentMatcher for TranslateMatcher {
    fn name(&self) -> &'static str {
        "translate"
    }

    fn claim(&self, utterance: &Utterance) -> Option<Intent> {
        let caps = RE_TRANSLATE.captures(&utterance.text)?;
        let rest = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

        let missing = || Intent::Translate {
            request: Err(RouteError::MissingArgument {
                intent: "translate",
                usage: TRANSLATE_USAGE,
            }),
        };

        let Some(to) = RE_TO.find(rest) else {
            return Some(missing());
        };
        let text = rest[..to.start()].trim();
        let language = trim_punctuation(&rest[to.end()..]);
        if text.is_empty() || language.is_empty() {
            return Some(missing());
        }

        Some(Intent::Translate {
            request: Ok(TranslateArgs {
                text: text.to_string(),
                target_language: language_code(language),
            }),
        })
    }
}

/// Anything asking for a joke.
pub struct JokeMatcher;

impl IntentMatcher for JokeMatcher {
    fn name(&self) -> &'static str {
        "joke"
    }

    fn claim(&self, utterance: &Utterance) -> Option<Intent> {
        RE_JOKE.is_match(&utterance.text).then_some(Intent::Joke)
    }
}

/// Terminal rule: arithmetic if something evaluates, otherwise unknown.
pub struct MathMatcher;

impl IntentMatcher for MathMatcher {
    fn name(&self) -> &'static str {
        "math"
    }

    fn claim(&self, utterance: &Utterance) -> Option<Intent> {
        let expression = math::extract_expression(&utterance.text);
        if expression.is_empty() {
            return Some(Intent::Unknown {
                text: utterance.text.clone(),
                failure: None,
            });
        }
        match math::evaluate(&expression) {
            Ok(value) => Some(Intent::Math { expression, value }),
            Err(e) => Some(Intent::Unknown {
                text: utterance.text.clone(),
                failure: Some(e),
            }),
        }
    }
}

fn trim_punctuation(s: &str) -> &str {
    s.trim()
        .trim_end_matches(['?', '!', '.', ','])
        .trim()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utterance_is_trimmed_and_lowered() {
        let u = Utterance::new("  Weather In PARIS  ");
        assert_eq!(u.text, "Weather In PARIS");
        assert_eq!(u.lower, "weather in paris");
    }

    #[test]
    fn weather_requires_whole_word() {
        let m = WeatherMatcher {
            default_city: "Athens".into(),
        };
        assert!(m.claim(&Utterance::new("weatherproof jacket")).is_none());
        assert!(m.claim(&Utterance::new("Athens weather")).is_some());
    }

    #[test]
    fn weather_strips_trailing_question_mark() {
        let m = WeatherMatcher {
            default_city: "Athens".into(),
        };
        let intent = m.claim(&Utterance::new("weather in Oslo?")).unwrap();
        assert_eq!(intent, Intent::Weather { city: "Oslo".into() });
    }

    #[test]
    fn lookup_requires_whole_trigger_word() {
        assert!(LookupMatcher.claim(&Utterance::new("wikipedia rocks")).is_none());
        assert!(LookupMatcher.claim(&Utterance::new("searching")).is_none());
    }

    #[test]
    fn translate_splits_on_first_standalone_to() {
        let intent = TranslateMatcher
            .claim(&Utterance::new("translate tomato to Spanish"))
            .unwrap();
        assert_eq!(
            intent,
            Intent::Translate {
                request: Ok(TranslateArgs {
                    text: "tomato".into(),
                    target_language: "es".into(),
                }),
            }
        );

        let intent = TranslateMatcher
            .claim(&Utterance::new("translate hello TO French"))
            .unwrap();
        assert_eq!(
            intent,
            Intent::Translate {
                request: Ok(TranslateArgs {
                    text: "hello".into(),
                    target_language: "fr".into(),
                }),
            }
        );
    }

    #[test]
    fn translate_with_empty_text_is_missing_argument() {
        let intent = TranslateMatcher
            .claim(&Utterance::new("translate to french"))
            .unwrap();
        assert!(matches!(
            intent,
            Intent::Translate {
                request: Err(RouteError::MissingArgument { .. })
            }
        ));
    }

    #[test]
    fn math_matcher_reports_eval_failure() {
        let intent = MathMatcher.claim(&Utterance::new("what about 2+")).unwrap();
        assert!(matches!(
            intent,
            Intent::Unknown {
                failure: Some(crate::error::EvalError::InvalidExpression { .. }),
                ..
            }
        ));
    }
}
