//! Smart Kisaan - Backend Server
//!
//! Farmer advisory API: crop recommendation, irrigation planning, yield
//! prediction, price forecasting and risk analysis, each grounded in live
//! weather and answered by a hosted language model.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;

use external::{
    BedrockClient, CognitoClient, CognitoTokenVerifier, OpenWeatherClient, TokenVerifier,
};
use services::{AdvisoryService, AuthService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub advisory: AdvisoryService,
    pub auth: AuthService,
    pub token_verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    /// Build every upstream client from configuration. All of them share one
    /// connection pool.
    pub fn from_config(config: Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("smart-kisaan/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let weather = OpenWeatherClient::with_base_url(
            http.clone(),
            config.weather.api_key.clone(),
            config.weather.api_endpoint.clone(),
        );
        let model = BedrockClient::new(http.clone(), &config.bedrock);
        let advisory = AdvisoryService::new(
            Arc::new(weather),
            Arc::new(model),
            config.weather.country_code.clone(),
        );
        let auth = AuthService::new(CognitoClient::new(http.clone(), &config.cognito));
        let token_verifier = Arc::new(CognitoTokenVerifier::new(http, &config.cognito));

        Ok(Self {
            config: Arc::new(config),
            advisory,
            auth,
            token_verifier,
        })
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .merge(routes::api_routes(state.clone()))
        .fallback(handlers::route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
