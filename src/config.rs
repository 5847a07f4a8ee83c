use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::{
    error::{PlannerError, Result},
    services::openai_client::DEFAULT_BASE_URL,
};

pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_DATASET_PATH: &str = "data/tourism_data.csv";
pub const DEFAULT_TOP_K: usize = 15;

/// Which embedder the retrieval index is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbedderKind {
    #[default]
    OpenAi,
    Hashed,
}

impl FromStr for EmbedderKind {
    type Err = PlannerError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "openai" => Ok(EmbedderKind::OpenAi),
            "hashed" | "hash" => Ok(EmbedderKind::Hashed),
            other => Err(PlannerError::Config(format!(
                "unknown embedder `{}` (expected `openai` or `hashed`)",
                other
            ))),
        }
    }
}

/// Runtime configuration for a planner process.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub temperature: f32,
    pub embedding_model: String,
    pub embedder: EmbedderKind,
    pub dataset_path: PathBuf,
    pub top_k: usize,
    pub timeout: Duration,
}

impl PlannerConfig {
    /// Configuration with defaults for everything except the credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            temperature: 0.2,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedder: EmbedderKind::default(),
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            top_k: DEFAULT_TOP_K,
            timeout: Duration::from_secs(120),
        }
    }

    /// Load from the process environment (after `.env`, if any).
    ///
    /// A missing `OPENAI_API_KEY` is fatal.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; `from_env` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                PlannerError::Config(
                    "OPENAI_API_KEY must be set in the environment or .env file".to_string(),
                )
            })?;

        let mut config = Self::new(api_key);

        if let Some(base_url) = lookup("OPENAI_BASE_URL").or_else(|| lookup("OPENROUTER_BASE_URL"))
        {
            config.base_url = base_url;
        }
        if let Some(model) = lookup("TRIP_CHAT_MODEL") {
            config.chat_model = model;
        }
        if let Some(raw) = lookup("TRIP_TEMPERATURE") {
            config.temperature = parse_setting("TRIP_TEMPERATURE", &raw)?;
        }
        if let Some(model) = lookup("TRIP_EMBEDDING_MODEL") {
            config.embedding_model = model;
        }
        if let Some(raw) = lookup("TRIP_EMBEDDER") {
            config.embedder = raw.parse()?;
        }
        if let Some(path) = lookup("TRIP_DATASET") {
            config.dataset_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup("TRIP_TOP_K") {
            config.top_k = parse_setting("TRIP_TOP_K", &raw)?;
        }
        if let Some(raw) = lookup("TRIP_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_setting("TRIP_TIMEOUT_SECS", &raw)?);
        }

        Ok(config)
    }
}

fn parse_setting<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| PlannerError::Config(format!("{} has an invalid value: `{}`", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = PlannerConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_is_fatal() {
        assert!(PlannerConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")]))
            .unwrap();

        assert_eq!(config.chat_model, DEFAULT_CHAT_MODEL);
        assert_eq!(config.top_k, 15);
        assert_eq!(config.embedder, EmbedderKind::OpenAi);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_overrides() {
        let config = PlannerConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENROUTER_BASE_URL", "https://openrouter.ai/api/v1"),
            ("TRIP_TOP_K", "25"),
            ("TRIP_EMBEDDER", "hashed"),
            ("TRIP_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(config.top_k, 25);
        assert_eq!(config.embedder, EmbedderKind::Hashed);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let err = PlannerConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("TRIP_TOP_K", "many"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("TRIP_TOP_K"));
    }
}
