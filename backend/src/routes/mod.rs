//! Route definitions for the Smart Kisaan API

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use shared::{
    CropRecommendRequest, IrrigationPlanRequest, PriceForecastRequest, RiskAnalyzeRequest,
    YieldPredictRequest,
};

use crate::{handlers, middleware::require_auth, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Auth routes (public and protected)
        .nest("/auth", auth_routes(state.clone()))
        // Protected routes - advisory features
        .merge(advisory_routes(state))
}

/// Authentication routes
fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/profile", get(handlers::get_profile))
        .route("/signout", post(handlers::sign_out))
        .route("/change-password", post(handlers::change_password))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/signup", post(handlers::sign_up))
        .route("/confirm-signup", post(handlers::confirm_sign_up))
        .route("/resend-code", post(handlers::resend_code))
        .route("/signin", post(handlers::sign_in))
        .route("/forgot-password", post(handlers::forgot_password))
        .route("/reset-password", post(handlers::reset_password))
        .route("/refresh-token", post(handlers::refresh_token))
        .merge(protected)
}

/// Advisory routes (protected)
fn advisory_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/crop/recommend", post(handlers::advise::<CropRecommendRequest>))
        .route("/irrigation/plan", post(handlers::advise::<IrrigationPlanRequest>))
        .route("/yield/predict", post(handlers::advise::<YieldPredictRequest>))
        .route("/price/forecast", post(handlers::advise::<PriceForecastRequest>))
        .route("/risk/analyze", post(handlers::advise::<RiskAnalyzeRequest>))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
