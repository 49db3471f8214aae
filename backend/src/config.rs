//! Configuration management for the Smart Kisaan backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with KISAAN__ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// OpenWeatherMap configuration
    pub weather: WeatherConfig,

    /// Bedrock model configuration
    pub bedrock: BedrockConfig,

    /// Cognito user pool configuration
    pub cognito: CognitoConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key
    pub api_key: String,

    /// Country appended to city/state queries
    pub country_code: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BedrockConfig {
    pub region: String,

    pub model_id: String,

    /// Bedrock API key, sent as a bearer token
    pub api_key: String,

    /// Overrides `https://bedrock-runtime.<region>.amazonaws.com`
    pub endpoint: Option<String>,

    pub max_tokens: u32,

    pub temperature: f64,

    pub anthropic_version: String,
}

impl BedrockConfig {
    pub fn base_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://bedrock-runtime.{}.amazonaws.com", self.region))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CognitoConfig {
    pub region: String,

    pub user_pool_id: String,

    /// App client id
    pub client_id: String,

    /// App client secret, when the app client has one
    pub client_secret: Option<String>,

    /// Overrides `https://cognito-idp.<region>.amazonaws.com`
    pub endpoint: Option<String>,

    /// How long fetched signing keys are trusted
    pub jwks_cache_ttl_secs: u64,
}

impl CognitoConfig {
    pub fn base_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://cognito-idp.{}.amazonaws.com", self.region))
    }

    /// Expected `iss` claim of pool tokens
    pub fn issuer(&self) -> String {
        format!(
            "https://cognito-idp.{}.amazonaws.com/{}",
            self.region, self.user_pool_id
        )
    }

    pub fn jwks_url(&self) -> String {
        format!(
            "{}/{}/.well-known/jwks.json",
            self.base_url().trim_end_matches('/'),
            self.user_pool_id
        )
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("KISAAN_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("weather.api_endpoint", "https://api.openweathermap.org/data/2.5")?
            .set_default("weather.api_key", "")?
            .set_default("weather.country_code", "IN")?
            .set_default("bedrock.region", "us-east-1")?
            .set_default("bedrock.model_id", "anthropic.claude-3-haiku-20240307-v1:0")?
            .set_default("bedrock.api_key", "")?
            .set_default("bedrock.max_tokens", 4096)?
            .set_default("bedrock.temperature", 0.3)?
            .set_default("bedrock.anthropic_version", "bedrock-2023-05-31")?
            .set_default("cognito.region", "ap-south-1")?
            .set_default("cognito.user_pool_id", "")?
            .set_default("cognito.client_id", "")?
            .set_default("cognito.jwks_cache_ttl_secs", 600)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (KISAAN__ prefix)
            .add_source(
                Environment::with_prefix("KISAAN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
