use std::env;
use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::errors::SummarizerError;

pub const DEFAULT_LOCAL_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_LOCAL_MODEL: &str = "llama3.2-vision";
pub const DEFAULT_CLOUD_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_CLOUD_MODEL: &str = "llama-3.3-70b-versatile";

/// Stand-in credential used when `GROQ_API_KEY` is unset. Requests made with it
/// are expected to be rejected by the cloud backend.
pub const PLACEHOLDER_API_KEY: &str = "your_groq_api_key_here";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Local,
    Cloud,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Local => "local",
            BackendKind::Cloud => "cloud",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = SummarizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "ollama" => Ok(BackendKind::Local),
            "cloud" | "groq" => Ok(BackendKind::Cloud),
            other => Err(SummarizerError::ConfigError(format!(
                "SUMMARIZER_BACKEND: unknown backend '{other}' (expected 'local' or 'cloud')"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocalBackendConfig {
    pub url: String,
    pub model: String,
}

#[derive(Clone)]
pub struct CloudBackendConfig {
    pub url: String,
    pub model: String,
    pub api_key: String,
}

impl CloudBackendConfig {
    pub fn has_placeholder_key(&self) -> bool {
        self.api_key.trim().is_empty() || self.api_key == PLACEHOLDER_API_KEY
    }
}

// Keeps the credential out of `{:?}` output and therefore out of the logs.
impl fmt::Debug for CloudBackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudBackendConfig")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendKind,
    pub local: LocalBackendConfig,
    pub cloud: CloudBackendConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, SummarizerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Unset or blank
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SummarizerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match get("SUMMARIZER_BACKEND") {
            Some(raw) => raw.parse()?,
            None => BackendKind::default(),
        };

        let local = LocalBackendConfig {
            url: validate_url("OLLAMA_URL", get("OLLAMA_URL"), DEFAULT_LOCAL_URL)?,
            model: get("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_LOCAL_MODEL.to_string()),
        };

        let cloud = CloudBackendConfig {
            url: validate_url("GROQ_API_URL", get("GROQ_API_URL"), DEFAULT_CLOUD_URL)?,
            model: get("GROQ_MODEL").unwrap_or_else(|| DEFAULT_CLOUD_MODEL.to_string()),
            api_key: get("GROQ_API_KEY").unwrap_or_else(|| PLACEHOLDER_API_KEY.to_string()),
        };

        Ok(Self {
            backend,
            local,
            cloud,
        })
    }

    /// Model name of the currently selected backend.
    pub fn active_model(&self) -> &str {
        match self.backend {
            BackendKind::Local => &self.local.model,
            BackendKind::Cloud => &self.cloud.model,
        }
    }

    pub fn set_active_model(&mut self, model: String) {
        match self.backend {
            BackendKind::Local => self.local.model = model,
            BackendKind::Cloud => self.cloud.model = model,
        }
    }
}

fn validate_url(
    key: &str,
    value: Option<String>,
    default: &str,
) -> Result<String, SummarizerError> {
    let raw = value.unwrap_or_else(|| default.to_string());
    let parsed = Url::parse(&raw)
        .map_err(|e| SummarizerError::ConfigError(format!("{key}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(raw),
        scheme => Err(SummarizerError::ConfigError(format!(
            "{key}: unsupported scheme '{scheme}'"
        ))),
    }
}
