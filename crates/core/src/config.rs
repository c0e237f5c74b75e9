//! Process-wide configuration, read once from the environment at startup.
use thiserror::Error;
use tracing::instrument;
use url::Url;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 512;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const USE_OPENAI_VAR: &str = "USE_OPENAI";
pub const PORT_VAR: &str = "PORT";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const MODEL_VAR: &str = "OPENAI_MODEL";
pub const TIMEOUT_VAR: &str = "OPENAI_TIMEOUT_SECS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },
    #[error("Invalid URL for {name}: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// Settings for the remote chat-completion provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// API key for the remote provider. `None` keeps every reply local.
    pub api_key: Option<String>,
    /// Route to the remote provider by default when a key is present.
    pub use_remote: bool,
    pub port: u16,
    pub provider: ProviderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            use_remote: false,
            port: DEFAULT_PORT,
            provider: ProviderConfig::default(),
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    #[instrument(skip(lookup))]
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match non_empty(PORT_VAR) {
            Some(v) => parse_value(PORT_VAR, &v)?,
            None => DEFAULT_PORT,
        };

        let base_url = match non_empty(BASE_URL_VAR) {
            Some(v) => {
                Url::parse(&v).map_err(|source| ConfigError::InvalidUrl {
                    name: BASE_URL_VAR,
                    source,
                })?;
                v
            }
            None => ProviderConfig::default().base_url,
        };

        let timeout_secs = match non_empty(TIMEOUT_VAR) {
            Some(v) => parse_value(TIMEOUT_VAR, &v)?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key: non_empty(API_KEY_VAR),
            use_remote: lookup(USE_OPENAI_VAR).is_some_and(|v| is_truthy(&v)),
            port,
            provider: ProviderConfig {
                base_url,
                model: non_empty(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                timeout_secs,
                ..ProviderConfig::default()
            },
        })
    }

    /// Applies a listen port given on the command line, which wins over `PORT`.
    pub fn with_port_override(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }
}

/// Accepts `1`, `true` and `yes` in any case.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

fn parse_value<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}
