//! HTTP handler shared by the advisory endpoints

use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use shared::{Advisory, EnrichedResult};

use crate::error::{AppError, AppResult};
use crate::handlers::ApiResponse;
use crate::middleware::CurrentUser;
use crate::AppState;

/// Run one advisory feature, chosen by the request type
pub async fn advise<A: Advisory>(
    State(state): State<AppState>,
    current_user: CurrentUser,
    WithRejection(Json(request), _): WithRejection<Json<A>, AppError>,
) -> AppResult<Json<ApiResponse<EnrichedResult>>> {
    tracing::debug!(user = %current_user.user.sub, feature = A::FEATURE.slug(), "Advisory request");

    let result = state
        .advisory
        .run(&request)
        .await
        .map_err(|e| e.for_feature(A::FEATURE))?;

    Ok(Json(ApiResponse::new(result)))
}
