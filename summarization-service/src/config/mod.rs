use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

/// 10 MiB: dashboards with many tiles post their full result sets.
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const DEFAULT_METADATA_SERVER_URL: &str = "http://metadata.google.internal";

/// Process-wide settings, read once at startup and never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct SummarizationConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub auth: AuthConfig,
    pub model: ModelConfig,
    pub credentials: CredentialsConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared secret the Looker extension sends as `client_secret`.
    pub client_secret: Secret<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub backend: Backend,
    /// Cloud project id; required by the Vertex backend.
    pub project: String,
    pub region: String,
    pub model: String,
    /// Overrides the upstream base URL (tests, private endpoints).
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsConfig {
    pub token_strategy: TokenStrategy,
    pub metadata_server_url: String,
    /// Used by [`TokenStrategy::Static`].
    pub access_token: Secret<String>,
    /// Used by [`Backend::Gemini`].
    pub api_key: Secret<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
    pub max_body_bytes: usize,
}

/// Which upstream the model gateway talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Vertex AI `generateContent` with a bearer token.
    Vertex,
    /// Gemini API `generateContent` with an API key.
    Gemini,
    /// In-process echo, for local development.
    Mock,
}

impl FromStr for Backend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertex" => Ok(Backend::Vertex),
            "gemini" => Ok(Backend::Gemini),
            "mock" => Ok(Backend::Mock),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "unknown GENAI_BACKEND '{}', expected vertex, gemini or mock",
                other
            ))),
        }
    }
}

/// How bearer tokens for the Vertex backend are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStrategy {
    /// Fetch a fresh token from the metadata server for every call.
    Metadata,
    /// Metadata server token, reused until shortly before it expires.
    Cached,
    /// A fixed token from `GOOGLE_ACCESS_TOKEN`.
    Static,
}

impl FromStr for TokenStrategy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metadata" => Ok(TokenStrategy::Metadata),
            "cached" => Ok(TokenStrategy::Cached),
            "static" => Ok(TokenStrategy::Static),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "unknown VERTEX_TOKEN_STRATEGY '{}', expected metadata, cached or static",
                other
            ))),
        }
    }
}

impl SummarizationConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let backend: Backend = get_env("GENAI_BACKEND", Some("vertex"), false)?.parse()?;
        let token_strategy: TokenStrategy =
            get_env("VERTEX_TOKEN_STRATEGY", Some("cached"), false)?.parse()?;

        let config = SummarizationConfig {
            common: common_config,
            auth: AuthConfig {
                client_secret: Secret::new(get_env("GENAI_CLIENT_SECRET", None, is_prod)?),
            },
            model: ModelConfig {
                backend,
                project: get_env("PROJECT", Some(""), is_prod && backend == Backend::Vertex)?,
                region: get_env("REGION", Some("us-central1"), false)?,
                model: get_env("MODEL", Some("gemini-1.5-flash"), false)?,
                api_base: env::var("GENAI_API_BASE").ok().filter(|s| !s.is_empty()),
            },
            credentials: CredentialsConfig {
                token_strategy,
                metadata_server_url: get_env(
                    "METADATA_SERVER_URL",
                    Some(DEFAULT_METADATA_SERVER_URL),
                    false,
                )?,
                access_token: Secret::new(get_env("GOOGLE_ACCESS_TOKEN", Some(""), false)?),
                api_key: Secret::new(get_env("GOOGLE_API_KEY", Some(""), false)?),
            },
            http: HttpConfig {
                allowed_origins: parse_origins(&get_env("CORS_ALLOWED_ORIGINS", Some(""), false)?),
                max_body_bytes: parse_max_body_bytes(&get_env(
                    "MAX_BODY_BYTES",
                    Some(&DEFAULT_MAX_BODY_BYTES.to_string()),
                    false,
                )?)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject combinations that could only fail at request time.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.client_secret.expose_secret().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "GENAI_CLIENT_SECRET must not be empty"
            )));
        }

        match self.model.backend {
            Backend::Vertex if self.model.project.is_empty() => {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "PROJECT is required for the vertex backend"
                )))
            }
            Backend::Vertex
                if self.credentials.token_strategy == TokenStrategy::Static
                    && self.credentials.access_token.expose_secret().is_empty() =>
            {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "GOOGLE_ACCESS_TOKEN is required for the static token strategy"
                )))
            }
            Backend::Gemini if self.credentials.api_key.expose_secret().is_empty() => {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "GOOGLE_API_KEY is required for the gemini backend"
                )))
            }
            _ => Ok(()),
        }
    }
}

fn parse_max_body_bytes(raw: &str) -> Result<usize, AppError> {
    raw.trim().parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!(
            "MAX_BODY_BYTES must be a byte count, got '{}': {}",
            raw,
            e
        ))
    })
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
