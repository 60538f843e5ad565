//! The assistant: route an utterance, dispatch it, record the exchange.
//!
//! Every failure below this layer (evaluator errors, provider outages, missing
//! arguments) becomes one of the fixed sentences in this module. Only session
//! errors (locked, not authenticated) reach the caller.

use serde::Serialize;

use crate::conversation::Speaker;
use crate::error::{ProviderError, SessionError};
use crate::intent::{Intent, IntentRouter, TranslateArgs};
use crate::math;
use crate::providers::{EncyclopediaProvider, JokeBook, TranslationProvider, WeatherProvider};
use crate::session::{Gate, Session};

pub const SOS_ACTIVATED: &str = "SOS activated. System locked.";
pub const EVAL_FAILED: &str = "I couldn't evaluate that math expression.";
pub const FALLBACK: &str = "I can help with math, weather, Wikipedia, jokes, or translations.";
pub const LOOKUP_MISSING: &str = "Please tell me what to search on Wikipedia.";
pub const LOOKUP_NOT_FOUND: &str = "No Wikipedia page found for that topic.";
pub const LOOKUP_UNAVAILABLE: &str = "Wikipedia is unavailable right now. Please try again later.";
pub const TRANSLATE_USAGE: &str = "Use: translate <text> to <language>";
pub const WEATHER_NOT_FOUND: &str = "Weather error: no matching location found.";
pub const WEATHER_UNAVAILABLE: &str = "Could not fetch weather right now. Please try again later.";

/// One answered utterance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub intent: Intent,
    pub text: String,
}

/// Router, gate and providers wired together.
pub struct Assistant {
    router: IntentRouter,
    gate: Gate,
    weather: Box<dyn WeatherProvider>,
    encyclopedia: Box<dyn EncyclopediaProvider>,
    translator: Box<dyn TranslationProvider>,
    jokes: JokeBook,
}

impl Assistant {
    pub fn new(
        router: IntentRouter,
        gate: Gate,
        weather: Box<dyn WeatherProvider>,
        encyclopedia: Box<dyn EncyclopediaProvider>,
        translator: Box<dyn TranslationProvider>,
        jokes: JokeBook,
    ) -> Self {
        Self {
            router,
            gate,
            weather,
            encyclopedia,
            translator,
            jokes,
        }
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    pub fn router(&self) -> &IntentRouter {
        &self.router
    }

    /// Handle one user submission.
    ///
    /// Blank input is ignored (`Ok(None)`) and leaves the transcript untouched.
    /// Otherwise the user turn and the reply are appended, in that order.
    pub fn respond(
        &self,
        session: &mut Session,
        utterance: &str,
    ) -> Result<Option<Reply>, SessionError> {
        session.ensure_active()?;

        let text = utterance.trim();
        if text.is_empty() {
            return Ok(None);
        }
        session.transcript_mut().append(Speaker::User, text);

        let intent = self.router.route(text);
        let reply = match &intent {
            Intent::Sos => {
                tracing::warn!("SOS received, locking system");
                self.gate.lock(session);
                SOS_ACTIVATED.to_string()
            }
            other => self.answer(other),
        };

        session
            .transcript_mut()
            .append(Speaker::Assistant, reply.clone());
        Ok(Some(Reply {
            intent,
            text: reply,
        }))
    }

    /// Produce the reply text for a routed intent.
    ///
    /// `Sos` only yields its confirmation sentence here; locking is done by
    /// [`Assistant::respond`], which has the session.
    pub fn answer(&self, intent: &Intent) -> String {
        match intent {
            Intent::Sos => SOS_ACTIVATED.to_string(),
            Intent::Weather { city } => self.weather_reply(city),
            Intent::Lookup { topic: Ok(topic) } => self.lookup_reply(topic),
            Intent::Lookup { topic: Err(_) } => LOOKUP_MISSING.to_string(),
            Intent::Joke => self.jokes.tell().to_string(),
            Intent::Translate { request: Ok(args) } => self.translate_reply(args),
            Intent::Translate { request: Err(_) } => TRANSLATE_USAGE.to_string(),
            Intent::Math { value, .. } => format!("The answer is {}", math::format_number(*value)),
            Intent::Unknown { failure: Some(e), .. } => {
                tracing::debug!(error = %e, "expression did not evaluate");
                EVAL_FAILED.to_string()
            }
            Intent::Unknown { failure: None, .. } => FALLBACK.to_string(),
        }
    }

    fn weather_reply(&self, city: &str) -> String {
        match self.weather.current(city) {
            Ok(report) => report.to_string(),
            Err(ProviderError::NotFound { .. }) => WEATHER_NOT_FOUND.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, city, "weather lookup failed");
                WEATHER_UNAVAILABLE.to_string()
            }
        }
    }

    fn lookup_reply(&self, topic: &str) -> String {
        match self.encyclopedia.summary(topic) {
            Ok(summary) => summary,
            Err(ProviderError::Ambiguous { candidates, .. }) if !candidates.is_empty() => {
                format!("Multiple matches. Did you mean: {}?", candidates.join(", "))
            }
            Err(ProviderError::Ambiguous { .. }) | Err(ProviderError::NotFound { .. }) => {
                LOOKUP_NOT_FOUND.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, topic, "encyclopedia lookup failed");
                LOOKUP_UNAVAILABLE.to_string()
            }
        }
    }

    fn translate_reply(&self, args: &TranslateArgs) -> String {
        match self.translator.translate(&args.text, &args.target_language) {
            Ok(translated) => translated,
            Err(e) => {
                tracing::warn!(error = %e, target = %args.target_language, "translation failed");
                format!(
                    "Translation error: could not translate to \"{}\".",
                    args.target_language
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::lock::MemoryLockStore;
    use crate::providers::{ProviderResult, WeatherReport};
    use crate::session::Identity;

    struct FixedWeather;
    impl WeatherProvider for FixedWeather {
        fn current(&self, city: &str) -> ProviderResult<WeatherReport> {
            if city == "Atlantis" {
                return Err(ProviderError::NotFound {
                    provider: "weather".into(),
                    subject: city.into(),
                });
            }
            Ok(WeatherReport {
                location: city.into(),
                country: "Greece".into(),
                condition: "Sunny".into(),
                temp_c: 21.0,
            })
        }
    }

    struct FixedWiki;
    impl EncyclopediaProvider for FixedWiki {
        fn summary(&self, topic: &str) -> ProviderResult<String> {
            match topic {
                "Mercury" => Err(ProviderError::Ambiguous {
                    subject: topic.into(),
                    candidates: vec!["Mercury (planet)".into(), "Mercury (element)".into()],
                }),
                "Nothing" => Err(ProviderError::NotFound {
                    provider: "wikipedia".into(),
                    subject: topic.into(),
                }),
                _ => Ok(format!("{topic} is a topic.")),
            }
        }
    }

    #[derive(Default)]
    struct RecordingTranslator {
        calls: RefCell<Vec<(String, String)>>,
    }
    impl TranslationProvider for RecordingTranslator {
        fn translate(&self, text: &str, target: &str) -> ProviderResult<String> {
            self.calls.borrow_mut().push((text.into(), target.into()));
            if target == "klingon" {
                return Err(ProviderError::unavailable("translation", "HTTP 400"));
            }
            Ok(format!("[{target}] {text}"))
        }
    }

    fn assistant() -> Assistant {
        let gate = Gate::new(
            vec![Identity {
                name: "Achilleas".into(),
                keyword: "open".into(),
                case_sensitive: true,
            }],
            "1234",
            Box::new(MemoryLockStore::default()),
        );
        Assistant::new(
            IntentRouter::default(),
            gate,
            Box::new(FixedWeather),
            Box::new(FixedWiki),
            Box::new(RecordingTranslator::default()),
            JokeBook::new(vec!["Only joke.".into()]),
        )
    }

    fn active_session(a: &Assistant) -> Session {
        let mut s = a.gate().open_session();
        a.gate().present_keyword(&mut s, "open").unwrap();
        s
    }

    fn say(a: &Assistant, s: &mut Session, text: &str) -> String {
        a.respond(s, text).unwrap().unwrap().text
    }

    #[test]
    fn math_reply() {
        let a = assistant();
        let mut s = active_session(&a);
        assert_eq!(say(&a, &mut s, "2 plus 2"), "The answer is 4");
        assert_eq!(say(&a, &mut s, "2 x 3 x 4"), "The answer is 24");
        assert_eq!(say(&a, &mut s, "7 / 2"), "The answer is 3.5");
        assert_eq!(say(&a, &mut s, "5/0"), EVAL_FAILED);
        assert_eq!(say(&a, &mut s, "hello"), FALLBACK);
    }

    #[test]
    fn weather_replies() {
        let a = assistant();
        let mut s = active_session(&a);
        assert_eq!(
            say(&a, &mut s, "weather"),
            "Weather in Athens, Greece: Sunny, 21°C."
        );
        assert_eq!(say(&a, &mut s, "weather in Atlantis"), WEATHER_NOT_FOUND);
    }

    #[test]
    fn lookup_replies() {
        let a = assistant();
        let mut s = active_session(&a);
        assert_eq!(say(&a, &mut s, "wiki Rust"), "Rust is a topic.");
        assert_eq!(
            say(&a, &mut s, "who is Mercury"),
            "Multiple matches. Did you mean: Mercury (planet), Mercury (element)?"
        );
        assert_eq!(say(&a, &mut s, "search Nothing"), LOOKUP_NOT_FOUND);
        assert_eq!(say(&a, &mut s, "wiki"), LOOKUP_MISSING);
    }

    #[test]
    fn translate_replies() {
        let a = assistant();
        let mut s = active_session(&a);
        assert_eq!(say(&a, &mut s, "translate hello to greek"), "[el] hello");
        assert_eq!(say(&a, &mut s, "translate hello"), TRANSLATE_USAGE);
        assert_eq!(
            say(&a, &mut s, "translate hello to klingon"),
            "Translation error: could not translate to \"klingon\"."
        );
    }

    #[test]
    fn joke_reply() {
        let a = assistant();
        let mut s = active_session(&a);
        assert_eq!(say(&a, &mut s, "tell me a joke"), "Only joke.");
    }

    #[test]
    fn sos_locks_session_and_store() {
        let a = assistant();
        let mut s = active_session(&a);
        assert_eq!(say(&a, &mut s, " SOS "), SOS_ACTIVATED);
        assert!(s.is_locked());
        assert!(a.gate().lock_state().locked);
        assert_eq!(a.respond(&mut s, "2+2"), Err(SessionError::Locked));
    }

    #[test]
    fn unauthenticated_session_is_refused() {
        let a = assistant();
        let mut s = a.gate().open_session();
        assert_eq!(a.respond(&mut s, "2+2"), Err(SessionError::NotAuthenticated));
        assert!(s.transcript().is_empty());
    }

    #[test]
    fn blank_input_is_ignored() {
        let a = assistant();
        let mut s = active_session(&a);
        assert_eq!(a.respond(&mut s, "   "), Ok(None));
        assert!(s.transcript().is_empty());
    }

    #[test]
    fn transcript_interleaves_turns() {
        let a = assistant();
        let mut s = active_session(&a);
        let inputs = ["1+1", "joke", "weather", "wiki Rust"];
        for input in inputs {
            say(&a, &mut s, input);
        }

        let turns = s.transcript().turns();
        assert_eq!(s.transcript().count(Speaker::User), inputs.len());
        assert!(s.transcript().count(Speaker::Assistant) <= inputs.len());
        let user_texts: Vec<&str> = turns
            .iter()
            .filter(|t| t.speaker == Speaker::User)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(user_texts, inputs);
        assert_eq!(turns[0].speaker, Speaker::User);
        assert_eq!(turns[1].speaker, Speaker::Assistant);
    }
}
