use crate::types::{AppError, Result};
use std::env;

/// Default OpenAI-compatible endpoint
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
/// Model used when `LLM_MODEL` is unset
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// weatherapi.com root; the tools append `/v1/current.json`
pub const DEFAULT_WEATHER_BASE: &str = "http://api.weatherapi.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub neo4j: Option<Neo4jConfig>,
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct LLMConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct Neo4jConfig {
    pub uri: String,
    pub username: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::Configuration(format!("PORT is not a valid port: {}", raw)))?,
            None => 5001,
        };

        let neo4j = match (
            non_empty("NEO4J_URI"),
            non_empty("NEO4J_USERNAME"),
            non_empty("NEO4J_PASSWORD"),
        ) {
            (Some(uri), Some(username), Some(password)) => Some(Neo4jConfig {
                uri,
                username,
                password,
                database: non_empty("NEO4J_DATABASE").unwrap_or_else(|| "neo4j".to_string()),
            }),
            _ => None,
        };

        Ok(Config {
            server: ServerConfig {
                host: non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port,
            },
            llm: LLMConfig {
                api_key: non_empty("OPENAI_API_KEY"),
                api_base: non_empty("OPENAI_API_BASE")
                    .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
                model: non_empty("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            },
            neo4j,
            weather: WeatherConfig {
                api_key: non_empty("WEATHERAPI_KEY"),
                base_url: non_empty("WEATHERAPI_BASE")
                    .unwrap_or_else(|| DEFAULT_WEATHER_BASE.to_string()),
            },
        })
    }

    /// The API key, or a configuration error naming the missing variable.
    pub fn require_api_key(&self) -> Result<&str> {
        self.llm
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration("OPENAI_API_KEY is not set".to_string()))
    }

    /// Neo4j settings, or a configuration error when any credential is missing.
    pub fn require_neo4j(&self) -> Result<&Neo4jConfig> {
        self.neo4j.as_ref().ok_or_else(|| {
            AppError::Configuration(
                "Missing Neo4j credentials: NEO4J_URI, NEO4J_USERNAME and NEO4J_PASSWORD must be set"
                    .to_string(),
            )
        })
    }
}
