use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::{
    common::{
        error::{AppError, ErrorResponse},
        token::AuthHeader,
    },
    controllers::schedules::{ResetTo, ScheduleResetter},
    handlers::courseware::CoursePath,
    AppState,
};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ResetScheduleReq {
    /// Reset to when course material became available instead of now
    #[serde(default)]
    pub use_availability_date: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResetScheduleResp {
    pub updated: u64,
}

#[utoipa::path(
    post,
    path = "/courses/{org}/{course}/{run}/schedule/reset",
    description = "Resets the caller's schedule in a self-paced course. Nothing is created if there is no schedule yet. Response is wrapped in data",
    params(
        ("org" = String, Path, description = "Course organisation"),
        ("course" = String, Path, description = "Course number"),
        ("run" = String, Path, description = "Course run"),
        ("Authorization" = String, Header, description = "JWT"),
    ),
    request_body = ResetScheduleReq,
    responses(
        (status = 200, description = "Number of schedules updated", body = ResetScheduleResp),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "Malformed course id", body = ErrorResponse),
        (status = 500, description = "Something went wrong", body = ErrorResponse),
    )
)]
pub async fn reset_schedule(
    State(state): State<AppState>,
    auth_header: AuthHeader,
    Path(path): Path<CoursePath>,
    Json(data): Json<ResetScheduleReq>,
) -> Result<Response, AppError> {
    let key = path.course_key()?;
    let updated = ScheduleResetter::default()
        .reset_self_paced_schedule(
            &state,
            auth_header.claims.id,
            &key,
            ResetTo::from(data.use_availability_date),
        )
        .await?;

    let resp = ResetScheduleResp { updated };
    let body = json!({
        "data": resp,
    });
    Ok((StatusCode::OK, Json(body)).into_response())
}
