//! Current conditions from weatherapi.com.

use serde::{Deserialize, Serialize};

use super::{ProviderResult, WeatherProvider, error_body, http_agent};
use crate::error::ProviderError;

const PROVIDER: &str = "weather";

/// weatherapi.com error code for an unknown location.
const NO_MATCHING_LOCATION: u32 = 1006;

/// Current conditions at a resolved location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: String,
    pub country: String,
    pub condition: String,
    pub temp_c: f64,
}

impl std::fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Weather in {}, {}: {}, {}°C.",
            self.location, self.country, self.condition, self.temp_c
        )
    }
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    location: ApiLocation,
    current: ApiCurrent,
}

#[derive(Debug, Deserialize)]
struct ApiLocation {
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    temp_c: f64,
    condition: ApiCondition,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<u32>,
    #[serde(default)]
    message: String,
}

/// Client for the `current.json` endpoint.
pub struct WeatherApiClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
}

impl WeatherApiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            agent: http_agent(timeout_secs),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn classify(city: &str, body: &str) -> ProviderError {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(env) if env.error.code == Some(NO_MATCHING_LOCATION) => ProviderError::NotFound {
                provider: PROVIDER.into(),
                subject: city.into(),
            },
            Ok(env) => ProviderError::unavailable(PROVIDER, env.error.message),
            Err(_) => ProviderError::unavailable(PROVIDER, body),
        }
    }
}

impl WeatherProvider for WeatherApiClient {
    fn current(&self, city: &str) -> ProviderResult<WeatherReport> {
        if self.api_key.is_empty() {
            return Err(ProviderError::unavailable(PROVIDER, "no API key configured"));
        }

        let url = format!("{}/current.json", self.base_url);
        let response = self
            .agent
            .get(&url)
            .query("key", &self.api_key)
            .query("q", city)
            .query("aqi", "no")
            .call();

        let body = match response {
            Ok(resp) => resp
                .into_string()
                .map_err(|e| ProviderError::unavailable(PROVIDER, e))?,
            Err(ureq::Error::Status(code, resp)) => {
                let body = error_body(resp);
                tracing::warn!(code, city, "weather request rejected");
                return Err(Self::classify(city, &body));
            }
            Err(ureq::Error::Transport(t)) => {
                tracing::warn!(error = %t, city, "weather transport error");
                return Err(ProviderError::unavailable(PROVIDER, t));
            }
        };

        // The API occasionally reports errors with a 200 status.
        if serde_json::from_str::<ErrorEnvelope>(&body).is_ok() {
            return Err(Self::classify(city, &body));
        }

        let parsed: CurrentResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::unavailable(PROVIDER, e))?;

        Ok(WeatherReport {
            location: parsed.location.name,
            country: parsed.location.country,
            condition: parsed.current.condition.text,
            temp_c: parsed.current.temp_c,
        })
    }
}
