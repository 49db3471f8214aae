//! Authentication middleware
//!
//! Bearer token verification for protected routes

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Serialize;

use crate::error::AppError;
use crate::AppState;

/// Authenticated user information extracted from the access token
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub sub: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub token_use: Option<String>,
}

/// The verified raw access token, for calls made on the user's behalf
#[derive(Clone, Debug)]
pub struct AccessToken(pub String);

/// Authentication middleware that verifies the bearer token and attaches
/// the user and the raw token to the request
pub async fn require_auth(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return Err(AppError::MissingToken);
    };
    let token = bearer.token().to_string();

    let user = state.token_verifier.verify(&token).await.map_err(|e| {
        tracing::warn!("Token verification failed: {}", e);
        e
    })?;

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(AccessToken(token));

    Ok(next.run(request).await)
}

/// Extractor for authenticated user
/// Use this in handlers behind `require_auth`
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user: AuthUser,
    pub access_token: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<AuthUser>().cloned();
        let token = parts.extensions.get::<AccessToken>().cloned();

        match (user, token) {
            (Some(user), Some(AccessToken(access_token))) => Ok(CurrentUser { user, access_token }),
            _ => Err(AppError::MissingToken),
        }
    }
}
