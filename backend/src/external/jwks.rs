//! Cognito access token verification
//!
//! RS256 tokens are checked against the user pool's published signing keys.
//! Keys are cached and refetched when stale or when a token names a key id
//! the cache does not know.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{
    decode, decode_header, errors::ErrorKind, jwk::JwkSet, Algorithm, DecodingKey, Validation,
};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;

use super::TokenVerifier;
use crate::config::CognitoConfig;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

/// Claims read from a Cognito access token
#[derive(Debug, Deserialize)]
struct AccessClaims {
    sub: String,
    email: Option<String>,
    username: Option<String>,
    token_use: Option<String>,
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

/// Verifies access tokens issued by one Cognito user pool
pub struct CognitoTokenVerifier {
    client: Client,
    jwks_url: String,
    issuer: String,
    ttl: Duration,
    cache: RwLock<Option<CachedKeys>>,
}

impl CognitoTokenVerifier {
    pub fn new(client: Client, config: &CognitoConfig) -> Self {
        Self {
            client,
            jwks_url: config.jwks_url(),
            issuer: config.issuer(),
            ttl: Duration::from_secs(config.jwks_cache_ttl_secs),
            cache: RwLock::new(None),
        }
    }

    async fn fetch_keys(&self) -> AppResult<JwkSet> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to fetch signing keys: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "Signing key endpoint returned {}",
                response.status()
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to parse signing keys: {}", e)))
    }

    /// Decoding key for `kid`, from cache when fresh
    async fn decoding_key(&self, kid: &str) -> AppResult<DecodingKey> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < self.ttl {
                    if let Some(jwk) = cached.keys.find(kid) {
                        return DecodingKey::from_jwk(jwk)
                            .map_err(|e| AppError::InvalidToken(e.to_string()));
                    }
                }
            }
        }

        tracing::debug!("Refreshing signing keys from {}", self.jwks_url);
        let keys = self.fetch_keys().await?;
        let key = keys
            .find(kid)
            .map(DecodingKey::from_jwk)
            .transpose()
            .map_err(|e| AppError::InvalidToken(e.to_string()))?;

        *self.cache.write().await = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });

        key.ok_or_else(|| AppError::InvalidToken(format!("Unknown signing key {}", kid)))
    }
}

#[async_trait]
impl TokenVerifier for CognitoTokenVerifier {
    async fn verify(&self, token: &str) -> AppResult<AuthUser> {
        let header = decode_header(token).map_err(|e| AppError::InvalidToken(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| AppError::InvalidToken("Token has no key id".into()))?;

        // A signing key that cannot be had fails the token, not the request
        let key = self.decoding_key(&kid).await.map_err(|e| match e {
            AppError::InvalidToken(_) => e,
            other => {
                tracing::error!("Signing key lookup failed: {}", other);
                AppError::InvalidToken(other.to_string())
            }
        })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        // Access tokens carry client_id instead of aud
        validation.validate_aud = false;

        let data = decode::<AccessClaims>(token, &key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken(e.to_string()),
        })?;

        Ok(AuthUser {
            sub: data.claims.sub,
            email: data.claims.email,
            username: data.claims.username,
            token_use: data.claims.token_use,
        })
    }
}
