use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::BloodRequestRow;
use crate::services::blood_request_service::{self, BloodRequestInput, StatusInput};
use crate::web::middleware::auth::AuthenticatedUser;

pub async fn create_request_handler(
    State(pool): State<SqlitePool>,
    body: Result<Json<BloodRequestInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<BloodRequestRow>)> {
    let Json(input) = body.map_err(|e| AppError::validation(e.body_text()))?;
    let created = blood_request_service::create_request(&pool, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_status_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(request_id): Path<String>,
    State(pool): State<SqlitePool>,
    body: Result<Json<StatusInput>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(input) = body.map_err(|e| AppError::validation(e.body_text()))?;
    let status =
        blood_request_service::update_status(&pool, &auth_user.id, &request_id, &input).await?;
    Ok(Json(json!({ "success": true, "status": status })))
}
