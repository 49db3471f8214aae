//! Error handling for the Smart Kisaan backend
//!
//! Every failure reaches the client as `{success: false, code, message}`.
//! Detail from upstream services is logged, never returned.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{Feature, ValidationError};
use thiserror::Error;

use crate::external::cognito::IdentityError;

pub const INVALID_AI_RESPONSE: &str = "AI returned an invalid response. Please try again.";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Request errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Route {method} {path} not found")]
    RouteNotFound { method: String, path: String },

    // Authentication errors
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    // Model errors
    #[error("Model access denied: {0}")]
    ModelAccessDenied(String),

    #[error("Model invocation error ({status}): {body}")]
    ModelInvocation { status: u16, body: String },

    #[error("Model request failed: {0}")]
    ModelTransport(String),

    #[error("Unexpected response format from model")]
    UnexpectedModelResponse,

    #[error("Model output is not a JSON object")]
    InvalidAiResponse,

    // Identity provider errors
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// A server-side failure inside one advisory feature
    #[error("{feature} failed: {source}")]
    Feature {
        feature: Feature,
        #[source]
        source: Box<AppError>,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Attach the feature to failures the farmer cannot act on, so they are
    /// answered with that feature's generic message.
    pub fn for_feature(self, feature: Feature) -> Self {
        match self {
            AppError::ModelInvocation { .. }
            | AppError::ModelTransport(_)
            | AppError::UnexpectedModelResponse
            | AppError::Configuration(_)
            | AppError::Internal(_) => AppError::Feature {
                feature,
                source: Box::new(self),
            },
            other => other,
        }
    }

    fn status_and_detail(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation { message, .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message.clone())
            }
            AppError::InvalidBody(msg) => (
                StatusCode::BAD_REQUEST,
                "INVALID_BODY",
                format!("Invalid request body: {}", msg),
            ),
            AppError::RouteNotFound { method, path } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("Route {} {} not found.", method, path),
            ),
            AppError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "MISSING_TOKEN",
                "Access token is missing. Please provide a Bearer token.".to_string(),
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_EXPIRED",
                "Token has expired. Please refresh your token.".to_string(),
            ),
            AppError::InvalidToken(_) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid or malformed token.".to_string(),
            ),
            AppError::ModelAccessDenied(_) => (
                StatusCode::FORBIDDEN,
                "MODEL_ACCESS_DENIED",
                "AWS Bedrock access denied. Please enable model access in AWS Console."
                    .to_string(),
            ),
            AppError::InvalidAiResponse => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INVALID_AI_RESPONSE",
                INVALID_AI_RESPONSE.to_string(),
            ),
            AppError::Identity(err) => identity_status_and_detail(err),
            AppError::Feature { feature, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "FEATURE_FAILED",
                feature.failure_message().to_string(),
            ),
            AppError::ModelInvocation { .. }
            | AppError::ModelTransport(_)
            | AppError::UnexpectedModelResponse
            | AppError::Configuration(_)
            | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error.".to_string(),
            ),
        }
    }
}

/// Fixed table from provider error names to farmer-facing answers
fn identity_status_and_detail(err: &IdentityError) -> (StatusCode, &'static str, String) {
    let IdentityError::Provider { name, message } = err else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "IDENTITY_ERROR",
            "An unexpected error occurred.".to_string(),
        );
    };

    let (status, text) = match name.as_str() {
        "UsernameExistsException" => (
            StatusCode::CONFLICT,
            "An account with this email already exists.",
        ),
        "UserNotFoundException" => (StatusCode::NOT_FOUND, "No account found with this email."),
        "NotAuthorizedException" => (StatusCode::UNAUTHORIZED, "Invalid email or password."),
        "CodeMismatchException" => (StatusCode::BAD_REQUEST, "Invalid verification code."),
        "ExpiredCodeException" => (
            StatusCode::BAD_REQUEST,
            "Verification code has expired. Please request a new one.",
        ),
        "InvalidPasswordException" => (
            StatusCode::BAD_REQUEST,
            "Password does not meet the requirements.",
        ),
        "LimitExceededException" => (
            StatusCode::TOO_MANY_REQUESTS,
            "Too many attempts. Please try again later.",
        ),
        "TooManyRequestsException" => (
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests. Please slow down.",
        ),
        "UserNotConfirmedException" => (
            StatusCode::FORBIDDEN,
            "Email not verified. Please verify your email first.",
        ),
        "InvalidParameterException" => {
            return (StatusCode::BAD_REQUEST, "INVALID_PARAMETER", message.clone());
        }
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "An unexpected error occurred.",
        ),
    };

    (status, "IDENTITY_ERROR", text.to_string())
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.status_and_detail();

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        let body = ErrorResponse {
            success: false,
            code: code.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
