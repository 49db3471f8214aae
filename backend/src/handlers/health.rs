//! Root, health check and fallback handlers

use axum::{
    http::{Method, Uri},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::error::AppError;

#[derive(Serialize)]
pub struct RootResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Root endpoint
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        success: true,
        message: "Smart Kisaan API is running".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Health check endpoint handler
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fallback for unknown routes
pub async fn route_not_found(method: Method, uri: Uri) -> AppError {
    AppError::RouteNotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
