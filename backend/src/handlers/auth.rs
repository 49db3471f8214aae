//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;

use crate::error::{AppError, AppResult};
use crate::handlers::ApiResponse;
use crate::middleware::CurrentUser;
use crate::services::auth::{
    ChangePasswordInput, CodeDeliveryResult, ConfirmSignUpInput, ForgotPasswordInput,
    MessageResult, ProfileResult, RefreshResult, RefreshTokenInput, ResendCodeInput,
    ResetPasswordInput, SignInInput, SignInResult, SignUpInput, SignUpResult,
};
use crate::AppState;

/// Sign up endpoint handler
pub async fn sign_up(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<SignUpInput>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<SignUpResult>>)> {
    let result = state.auth.sign_up(body).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(result))))
}

/// Confirm sign up endpoint handler
pub async fn confirm_sign_up(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<ConfirmSignUpInput>, AppError>,
) -> AppResult<Json<ApiResponse<MessageResult>>> {
    let result = state.auth.confirm_sign_up(body).await?;
    Ok(Json(ApiResponse::new(result)))
}

/// Resend confirmation code endpoint handler
pub async fn resend_code(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<ResendCodeInput>, AppError>,
) -> AppResult<Json<ApiResponse<CodeDeliveryResult>>> {
    let result = state.auth.resend_code(body).await?;
    Ok(Json(ApiResponse::new(result)))
}

/// Sign in endpoint handler
pub async fn sign_in(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<SignInInput>, AppError>,
) -> AppResult<Json<ApiResponse<SignInResult>>> {
    let result = state.auth.sign_in(body).await?;
    Ok(Json(ApiResponse::new(result)))
}

/// Profile of the signed-in user
pub async fn get_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<ProfileResult>>> {
    let result = state.auth.profile(&current_user.access_token).await?;
    Ok(Json(ApiResponse::new(result)))
}

/// Sign out from all devices
pub async fn sign_out(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<MessageResult>>> {
    let result = state.auth.sign_out(&current_user.access_token).await?;
    tracing::info!(user = %current_user.user.sub, "User signed out");
    Ok(Json(ApiResponse::new(result)))
}

/// Forgot password endpoint handler
pub async fn forgot_password(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<ForgotPasswordInput>, AppError>,
) -> AppResult<Json<ApiResponse<CodeDeliveryResult>>> {
    let result = state.auth.forgot_password(body).await?;
    Ok(Json(ApiResponse::new(result)))
}

/// Reset password endpoint handler
pub async fn reset_password(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<ResetPasswordInput>, AppError>,
) -> AppResult<Json<ApiResponse<MessageResult>>> {
    let result = state.auth.reset_password(body).await?;
    Ok(Json(ApiResponse::new(result)))
}

/// Change password while signed in
pub async fn change_password(
    State(state): State<AppState>,
    current_user: CurrentUser,
    WithRejection(Json(body), _): WithRejection<Json<ChangePasswordInput>, AppError>,
) -> AppResult<Json<ApiResponse<MessageResult>>> {
    let result = state
        .auth
        .change_password(&current_user.access_token, body)
        .await?;
    Ok(Json(ApiResponse::new(result)))
}

/// Refresh token endpoint handler
pub async fn refresh_token(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<RefreshTokenInput>, AppError>,
) -> AppResult<Json<ApiResponse<RefreshResult>>> {
    let result = state.auth.refresh_tokens(body).await?;
    Ok(Json(ApiResponse::new(result)))
}
