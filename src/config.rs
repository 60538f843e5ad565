//! Configuration, persisted as TOML in `$XDG_CONFIG_HOME/gideon/config.toml`.
//!
//! Every field has a default except the secrets (SOS code, identities), which
//! must be configured before `chat` or `unlock` will run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assistant::Assistant;
use crate::intent::IntentRouter;
use crate::lock::LockStore;
use crate::paths::{GideonPaths, PathResult};
use crate::providers::{GoogleTranslateClient, JokeBook, WeatherApiClient, WikipediaClient};
use crate::session::{Gate, Identity};

/// Environment variable that overrides `weather.api_key`.
pub const WEATHER_KEY_ENV: &str = "GIDEON_WEATHER_API_KEY";

/// Errors from configuration handling.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(gideon::config::read),
        help("Ensure the config file exists and is readable, or run `gideon init` to create one.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(gideon::config::parse),
        help("Check the TOML syntax in the config file.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(gideon::config::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("missing secret: {field}")]
    #[diagnostic(
        code(gideon::config::missing_secret),
        help(
            "Set `{field}` in the config file. Run `gideon init` to write a template \
             and fill in the [access] section."
        )
    )]
    MissingSecret { field: &'static str },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GideonConfig {
    #[serde(default)]
    pub access: AccessConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub encyclopedia: EncyclopediaConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub lock: LockConfig,
}

/// Secrets for the keyword gate and the unlock code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessConfig {
    #[serde(default)]
    pub sos_code: String,
    #[serde(default)]
    pub identities: Vec<Identity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_weather_url")]
    pub base_url: String,
    #[serde(default = "default_city")]
    pub default_city: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncyclopediaConfig {
    #[serde(default = "default_wiki_url")]
    pub base_url: String,
    /// Sentences kept from each summary.
    #[serde(default = "default_sentences")]
    pub sentences: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default = "default_translate_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Delay between characters of a reply; 0 disables the typing effect.
    #[serde(default = "default_typing_delay_ms")]
    pub typing_delay_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LockConfig {
    /// Lock file location; defaults to `$XDG_STATE_HOME/gideon/lock_state.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_weather_url() -> String {
    "http://api.weatherapi.com/v1".into()
}
fn default_city() -> String {
    crate::intent::DEFAULT_CITY.into()
}
fn default_timeout_secs() -> u64 {
    8
}
fn default_wiki_url() -> String {
    "https://en.wikipedia.org".into()
}
fn default_sentences() -> usize {
    2
}
fn default_translate_url() -> String {
    "https://translate.googleapis.com".into()
}
fn default_typing_delay_ms() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_weather_url(),
            default_city: default_city(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for EncyclopediaConfig {
    fn default() -> Self {
        Self {
            base_url: default_wiki_url(),
            sentences: default_sentences(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_url: default_translate_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            typing_delay_ms: default_typing_delay_ms(),
        }
    }
}

impl RenderConfig {
    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }
}

impl GideonConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Load from a TOML file, or defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse TOML text.
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<inline>".into(),
            message: e.to_string(),
        })
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Apply environment overrides, reading variables through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(WEATHER_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.weather.api_key = key.trim().to_string();
        }
    }

    /// Fail unless the gate secrets are configured.
    pub fn require_secrets(&self) -> ConfigResult<()> {
        if self.access.sos_code.trim().is_empty() {
            return Err(ConfigError::MissingSecret {
                field: "access.sos_code",
            });
        }
        let usable = self
            .access
            .identities
            .iter()
            .any(|id| !id.keyword.trim().is_empty());
        if !usable {
            return Err(ConfigError::MissingSecret {
                field: "access.identities",
            });
        }
        Ok(())
    }

    /// Lock file path: `lock.file` if set, otherwise the XDG state default.
    pub fn lock_file(&self) -> PathResult<PathBuf> {
        match &self.lock.file {
            Some(file) => Ok(file.clone()),
            None => Ok(GideonPaths::resolve()?.default_lock_file()),
        }
    }

    /// Build the keyword gate over the given lock store.
    pub fn gate(&self, store: Box<dyn LockStore>) -> Gate {
        let identities = self
            .access
            .identities
            .iter()
            .filter(|id| !id.keyword.trim().is_empty())
            .cloned()
            .collect();
        Gate::new(identities, self.access.sos_code.clone(), store)
    }

    /// Wire the router, gate and HTTP providers into an [`Assistant`].
    pub fn build_assistant(&self, store: Box<dyn LockStore>) -> Assistant {
        Assistant::new(
            IntentRouter::new(self.weather.default_city.clone()),
            self.gate(store),
            Box::new(WeatherApiClient::new(
                self.weather.base_url.clone(),
                self.weather.api_key.clone(),
                self.weather.timeout_secs,
            )),
            Box::new(WikipediaClient::new(
                self.encyclopedia.base_url.clone(),
                self.encyclopedia.sentences,
                self.encyclopedia.timeout_secs,
            )),
            Box::new(GoogleTranslateClient::new(
                self.translation.base_url.clone(),
                self.translation.timeout_secs,
            )),
            JokeBook::default(),
        )
    }

    /// A template with placeholder secrets, written by `gideon init`.
    pub fn template() -> Self {
        Self {
            access: AccessConfig {
                sos_code: String::new(),
                identities: vec![Identity {
                    name: "Operator".into(),
                    keyword: String::new(),
                    case_sensitive: true,
                }],
            },
            ..Default::default()
        }
    }
}
