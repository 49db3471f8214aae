//! Authentication service backed by the Cognito user pool
//!
//! Users sign up under a generated UUID username with their email as an
//! alias; confirm and resend use that username, everything else the email.

use serde::{Deserialize, Serialize};
use shared::fields;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::cognito::{AuthenticationResult, CodeDeliveryResponse};
use crate::external::CognitoClient;

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    cognito: CognitoClient,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpInput {
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmSignUpInput {
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub username: Option<String>,
    /// Accepted as a string or a number
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub confirmation_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendCodeInput {
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub username: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInInput {
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordInput {
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordInput {
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub confirmation_code: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub new_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordInput {
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub previous_password: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub new_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenInput {
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub refresh_token: Option<String>,
    /// Needed only when the app client has a secret
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResult {
    pub user_sub: String,
    /// Generated username, needed for confirm and resend
    pub username: String,
    pub is_confirmed: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageResult {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CodeDeliveryResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResult {
    pub access_token: String,
    pub id_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    pub token_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResult {
    pub access_token: String,
    pub id_token: Option<String>,
    pub expires_in: i64,
    pub token_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResult {
    pub username: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email_verified: bool,
    pub sub: Option<String>,
}

/// Both values present, or a 400 with `message`
fn require<'a>(
    values: &[(&'static str, &'a Option<String>)],
    message: &str,
) -> AppResult<Vec<&'a str>> {
    values
        .iter()
        .map(|&(field, value)| {
            value.as_deref().ok_or_else(|| AppError::Validation {
                field: field.to_string(),
                message: message.to_string(),
            })
        })
        .collect()
}

fn delivery(response: CodeDeliveryResponse, message: &'static str) -> CodeDeliveryResult {
    CodeDeliveryResult {
        destination: response.code_delivery_details.and_then(|d| d.destination),
        message,
    }
}

impl AuthService {
    pub fn new(cognito: CognitoClient) -> Self {
        Self { cognito }
    }

    pub async fn sign_up(&self, input: SignUpInput) -> AppResult<SignUpResult> {
        let required = require(
            &[
                ("email", &input.email),
                ("password", &input.password),
                ("name", &input.name),
            ],
            "Email, password, and name are required.",
        )?;
        let (email, password, name) = (required[0], required[1], required[2]);

        let username = Uuid::new_v4().to_string();
        let result = self
            .cognito
            .sign_up(&username, email, password, name, input.phone.as_deref())
            .await?;

        tracing::info!(user_sub = %result.user_sub, "User signed up");

        Ok(SignUpResult {
            user_sub: result.user_sub,
            username,
            is_confirmed: result.user_confirmed,
            message: "Sign up successful. Please check your email for the verification code.",
        })
    }

    pub async fn confirm_sign_up(&self, input: ConfirmSignUpInput) -> AppResult<MessageResult> {
        let required = require(
            &[
                ("username", &input.username),
                ("confirmationCode", &input.confirmation_code),
            ],
            "Username and confirmation code are required.",
        )?;

        self.cognito.confirm_sign_up(required[0], required[1]).await?;

        Ok(MessageResult {
            message: "Email verified successfully. You can now sign in.",
        })
    }

    pub async fn resend_code(&self, input: ResendCodeInput) -> AppResult<CodeDeliveryResult> {
        let required = require(&[("username", &input.username)], "Username is required.")?;

        let response = self.cognito.resend_confirmation_code(required[0]).await?;
        Ok(delivery(response, "Verification code resent successfully."))
    }

    pub async fn sign_in(&self, input: SignInInput) -> AppResult<SignInResult> {
        let required = require(
            &[("email", &input.email), ("password", &input.password)],
            "Email and password are required.",
        )?;

        let tokens: AuthenticationResult = self.cognito.sign_in(required[0], required[1]).await?;

        Ok(SignInResult {
            access_token: tokens.access_token,
            id_token: tokens.id_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            token_type: tokens.token_type,
        })
    }

    pub async fn profile(&self, access_token: &str) -> AppResult<ProfileResult> {
        let user = self.cognito.get_user(access_token).await?;

        let attribute = |name: &str| {
            user.user_attributes
                .iter()
                .find(|attr| attr.name == name)
                .and_then(|attr| attr.value.clone())
        };

        Ok(ProfileResult {
            email: attribute("email"),
            name: attribute("name"),
            phone: attribute("phone_number").filter(|p| !p.is_empty()),
            email_verified: attribute("email_verified").as_deref() == Some("true"),
            sub: attribute("sub"),
            username: user.username.clone(),
        })
    }

    pub async fn sign_out(&self, access_token: &str) -> AppResult<MessageResult> {
        self.cognito.global_sign_out(access_token).await?;

        Ok(MessageResult {
            message: "Signed out successfully from all devices.",
        })
    }

    pub async fn forgot_password(
        &self,
        input: ForgotPasswordInput,
    ) -> AppResult<CodeDeliveryResult> {
        let required = require(&[("email", &input.email)], "Email is required.")?;

        let response = self.cognito.forgot_password(required[0]).await?;
        Ok(delivery(response, "Password reset code sent to your email."))
    }

    pub async fn reset_password(&self, input: ResetPasswordInput) -> AppResult<MessageResult> {
        let required = require(
            &[
                ("email", &input.email),
                ("confirmationCode", &input.confirmation_code),
                ("newPassword", &input.new_password),
            ],
            "Email, confirmation code, and new password are required.",
        )?;

        self.cognito
            .confirm_forgot_password(required[0], required[1], required[2])
            .await?;

        Ok(MessageResult {
            message: "Password reset successfully. You can now sign in with your new password.",
        })
    }

    pub async fn change_password(
        &self,
        access_token: &str,
        input: ChangePasswordInput,
    ) -> AppResult<MessageResult> {
        let required = require(
            &[
                ("previousPassword", &input.previous_password),
                ("newPassword", &input.new_password),
            ],
            "Previous password and new password are required.",
        )?;

        self.cognito
            .change_password(access_token, required[0], required[1])
            .await?;

        Ok(MessageResult {
            message: "Password changed successfully.",
        })
    }

    pub async fn refresh_tokens(&self, input: RefreshTokenInput) -> AppResult<RefreshResult> {
        let required = require(
            &[("refreshToken", &input.refresh_token)],
            "Refresh token is required.",
        )?;

        let tokens = self
            .cognito
            .refresh_tokens(required[0], input.username.as_deref())
            .await?;

        Ok(RefreshResult {
            access_token: tokens.access_token,
            id_token: tokens.id_token,
            expires_in: tokens.expires_in,
            token_type: tokens.token_type,
        })
    }
}
