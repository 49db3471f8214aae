//! Cognito user pool client
//!
//! Talks to the Cognito Identity Provider JSON API directly. The operations
//! used here are public client operations and need no request signing; the
//! app client secret, when configured, goes into `SecretHash`.

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{de::DeserializeOwned, de::IgnoredAny, Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::config::CognitoConfig;

const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";

/// Failure reported by (or while reaching) the identity provider
#[derive(Error, Debug)]
pub enum IdentityError {
    /// Named provider exception, e.g. `NotAuthorizedException`
    #[error("{name}: {message}")]
    Provider { name: String, message: String },

    #[error("Identity provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected identity provider response: {0}")]
    UnexpectedResponse(String),

    #[error("Identity provider misconfigured: {0}")]
    Configuration(String),
}

/// Cognito client bound to one user pool app client
#[derive(Clone)]
pub struct CognitoClient {
    client: Client,
    base_url: String,
    client_id: String,
    client_secret: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct AttributeType<'a> {
    name: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SignUpRequest<'a> {
    client_id: &'a str,
    username: &'a str,
    password: &'a str,
    user_attributes: Vec<AttributeType<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret_hash: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignUpResponse {
    pub user_sub: String,
    #[serde(default)]
    pub user_confirmed: bool,
}

/// Username-scoped request shared by confirm, resend, forgot and reset
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct UserRequest<'a> {
    client_id: &'a str,
    username: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    confirmation_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret_hash: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodeDeliveryResponse {
    pub code_delivery_details: Option<CodeDeliveryDetails>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodeDeliveryDetails {
    pub destination: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthRequest<'a> {
    auth_flow: &'static str,
    client_id: &'a str,
    auth_parameters: HashMap<&'static str, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    authentication_result: Option<AuthenticationResult>,
}

/// Tokens issued by a successful authentication
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticationResult {
    pub access_token: String,
    pub id_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    pub token_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct AccessTokenRequest<'a> {
    access_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetUserResponse {
    pub username: String,
    #[serde(default)]
    pub user_attributes: Vec<UserAttribute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserAttribute {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ChangePasswordRequest<'a> {
    access_token: &'a str,
    previous_password: &'a str,
    proposed_password: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    #[serde(rename = "__type")]
    error_type: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

/// `base64(HMAC-SHA256(secret, username + client_id))`
pub fn secret_hash(
    client_secret: &str,
    username: &str,
    client_id: &str,
) -> Result<String, IdentityError> {
    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(client_secret.as_bytes())
        .map_err(|_| IdentityError::Configuration("Failed to create HMAC".into()))?;
    mac.update(username.as_bytes());
    mac.update(client_id.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Provider error name from `__type`, which may carry a namespace prefix
fn error_name(error_type: &str) -> &str {
    error_type.rsplit('#').next().unwrap_or(error_type)
}

impl CognitoClient {
    pub fn new(client: Client, config: &CognitoConfig) -> Self {
        Self {
            client,
            base_url: config.base_url(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone().filter(|s| !s.is_empty()),
        }
    }

    fn secret_hash_for(&self, username: &str) -> Result<Option<String>, IdentityError> {
        self.client_secret
            .as_deref()
            .map(|secret| secret_hash(secret, username, &self.client_id))
            .transpose()
    }

    /// POST one JSON API operation
    async fn call<Req, Resp>(&self, operation: &str, request: &Req) -> Result<Resp, IdentityError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .post(&self.base_url)
            .header("Content-Type", "application/x-amz-json-1.1")
            .header("X-Amz-Target", format!("{}.{}", TARGET_PREFIX, operation))
            .body(
                serde_json::to_vec(request)
                    .map_err(|e| IdentityError::UnexpectedResponse(e.to_string()))?,
            )
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body: ProviderErrorBody = serde_json::from_slice(&bytes).map_err(|_| {
                IdentityError::UnexpectedResponse(format!(
                    "{} {}",
                    status,
                    String::from_utf8_lossy(&bytes)
                ))
            })?;
            let name = body
                .error_type
                .as_deref()
                .map(error_name)
                .unwrap_or("UnknownError")
                .to_string();
            return Err(IdentityError::Provider {
                name,
                message: body.message.unwrap_or_default(),
            });
        }

        // Operations without output answer with an empty body
        let bytes: &[u8] = if bytes.is_empty() { b"{}" } else { &bytes };
        serde_json::from_slice(bytes)
            .map_err(|e| IdentityError::UnexpectedResponse(format!("{}: {}", operation, e)))
    }

    pub async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
        name: &str,
        phone: Option<&str>,
    ) -> Result<SignUpResponse, IdentityError> {
        let mut user_attributes = vec![
            AttributeType {
                name: "email",
                value: email,
            },
            AttributeType { name: "name", value: name },
        ];
        if let Some(phone) = phone {
            user_attributes.push(AttributeType {
                name: "phone_number",
                value: phone,
            });
        }

        let request = SignUpRequest {
            client_id: &self.client_id,
            username,
            password,
            user_attributes,
            secret_hash: self.secret_hash_for(username)?,
        };
        self.call("SignUp", &request).await
    }

    pub async fn confirm_sign_up(&self, username: &str, code: &str) -> Result<(), IdentityError> {
        let request = UserRequest {
            client_id: &self.client_id,
            username,
            confirmation_code: Some(code),
            password: None,
            secret_hash: self.secret_hash_for(username)?,
        };
        let _: IgnoredAny = self.call("ConfirmSignUp", &request).await?;
        Ok(())
    }

    pub async fn resend_confirmation_code(
        &self,
        username: &str,
    ) -> Result<CodeDeliveryResponse, IdentityError> {
        let request = UserRequest {
            client_id: &self.client_id,
            username,
            confirmation_code: None,
            password: None,
            secret_hash: self.secret_hash_for(username)?,
        };
        self.call("ResendConfirmationCode", &request).await
    }

    /// `USER_PASSWORD_AUTH` with the email alias as username
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticationResult, IdentityError> {
        let mut params = HashMap::from([
            ("USERNAME", email.to_string()),
            ("PASSWORD", password.to_string()),
        ]);
        if let Some(hash) = self.secret_hash_for(email)? {
            params.insert("SECRET_HASH", hash);
        }
        self.initiate_auth("USER_PASSWORD_AUTH", params).await
    }

    /// `REFRESH_TOKEN_AUTH`. A secret-enabled app client also needs the
    /// username the tokens were issued to.
    pub async fn refresh_tokens(
        &self,
        refresh_token: &str,
        username: Option<&str>,
    ) -> Result<AuthenticationResult, IdentityError> {
        let mut params = HashMap::from([("REFRESH_TOKEN", refresh_token.to_string())]);
        if let Some(username) = username {
            if let Some(hash) = self.secret_hash_for(username)? {
                params.insert("SECRET_HASH", hash);
            }
        }
        self.initiate_auth("REFRESH_TOKEN_AUTH", params).await
    }

    async fn initiate_auth(
        &self,
        auth_flow: &'static str,
        auth_parameters: HashMap<&'static str, String>,
    ) -> Result<AuthenticationResult, IdentityError> {
        let request = InitiateAuthRequest {
            auth_flow,
            client_id: &self.client_id,
            auth_parameters,
        };
        let response: InitiateAuthResponse = self.call("InitiateAuth", &request).await?;
        // A challenge (MFA, new password) comes back without tokens
        response.authentication_result.ok_or_else(|| {
            IdentityError::UnexpectedResponse("authentication challenge not supported".into())
        })
    }

    pub async fn get_user(&self, access_token: &str) -> Result<GetUserResponse, IdentityError> {
        self.call("GetUser", &AccessTokenRequest { access_token })
            .await
    }

    pub async fn global_sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        let _: IgnoredAny = self
            .call("GlobalSignOut", &AccessTokenRequest { access_token })
            .await?;
        Ok(())
    }

    pub async fn forgot_password(
        &self,
        email: &str,
    ) -> Result<CodeDeliveryResponse, IdentityError> {
        let request = UserRequest {
            client_id: &self.client_id,
            username: email,
            confirmation_code: None,
            password: None,
            secret_hash: self.secret_hash_for(email)?,
        };
        self.call("ForgotPassword", &request).await
    }

    pub async fn confirm_forgot_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), IdentityError> {
        let request = UserRequest {
            client_id: &self.client_id,
            username: email,
            confirmation_code: Some(code),
            password: Some(new_password),
            secret_hash: self.secret_hash_for(email)?,
        };
        let _: IgnoredAny = self.call("ConfirmForgotPassword", &request).await?;
        Ok(())
    }

    pub async fn change_password(
        &self,
        access_token: &str,
        previous_password: &str,
        proposed_password: &str,
    ) -> Result<(), IdentityError> {
        let request = ChangePasswordRequest {
            access_token,
            previous_password,
            proposed_password,
        };
        let _: IgnoredAny = self.call("ChangePassword", &request).await?;
        Ok(())
    }
}
