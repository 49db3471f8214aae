//! External API integrations
//!
//! Weather, model and token verification sit behind traits so the advisory
//! pipeline and the router can be exercised with in-process stubs.

use async_trait::async_trait;
use shared::WeatherSnapshot;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

pub mod bedrock;
pub mod cognito;
pub mod jwks;
pub mod weather;

pub use bedrock::BedrockClient;
pub use cognito::CognitoClient;
pub use jwks::CognitoTokenVerifier;
pub use weather::{OpenWeatherClient, WeatherError, WeatherQuery};

/// Current conditions for a farm location
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// `Ok(None)` when the provider answered but had nothing usable
    async fn current_weather(
        &self,
        query: &WeatherQuery,
    ) -> Result<Option<WeatherSnapshot>, WeatherError>;
}

/// Text generation model
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Send one system prompt and one user message, return the reply text
    async fn invoke(&self, system_prompt: &str, user_message: &str) -> AppResult<String>;
}

/// Access token verification
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> AppResult<AuthUser>;
}
