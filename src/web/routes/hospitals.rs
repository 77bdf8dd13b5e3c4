use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::{BloodDonationRow, BloodInventoryRow, BloodRequestRow, HospitalRow};
use crate::services::blood_request_service;
use crate::services::donation_service::{self, DonationInput};
use crate::services::hospital_service::{self, HospitalInput};
use crate::services::inventory_service::{self, InventoryEntryInput};
use crate::web::middleware::auth::AuthenticatedUser;

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    body.map(|Json(v)| v)
        .map_err(|e| AppError::validation(e.body_text()))
}

pub async fn my_hospitals_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
) -> AppResult<Json<Vec<HospitalRow>>> {
    Ok(Json(
        hospital_service::list_my_hospitals(&pool, &auth_user.id).await?,
    ))
}

pub async fn create_hospital_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
    body: Result<Json<HospitalInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<HospitalRow>)> {
    let input = json_body(body)?;
    let hospital = hospital_service::register_hospital(&pool, &auth_user.id, &input).await?;
    Ok((StatusCode::CREATED, Json(hospital)))
}

pub async fn update_hospital_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(hospital_id): Path<String>,
    State(pool): State<SqlitePool>,
    body: Result<Json<HospitalInput>, JsonRejection>,
) -> AppResult<Json<HospitalRow>> {
    let input = json_body(body)?;
    let hospital =
        hospital_service::update_hospital(&pool, &auth_user.id, &hospital_id, &input).await?;
    Ok(Json(hospital))
}

pub async fn inventory_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(hospital_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> AppResult<Json<Vec<BloodInventoryRow>>> {
    Ok(Json(
        inventory_service::load_inventory(&pool, &auth_user.id, &hospital_id).await?,
    ))
}

pub async fn update_inventory_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(hospital_id): Path<String>,
    State(pool): State<SqlitePool>,
    body: Result<Json<Vec<InventoryEntryInput>>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let entries = json_body(body)?;
    let report =
        inventory_service::update_inventory(&pool, &auth_user.id, &hospital_id, &entries).await?;
    Ok(Json(json!({
        "success": true,
        "updated": report.updated,
        "missing": report.missing,
    })))
}

pub async fn create_donation_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(hospital_id): Path<String>,
    State(pool): State<SqlitePool>,
    body: Result<Json<DonationInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<BloodDonationRow>)> {
    let input = json_body(body)?;
    let donation =
        donation_service::record_donation(&pool, &auth_user.id, &hospital_id, &input).await?;
    Ok((StatusCode::CREATED, Json(donation)))
}

pub async fn donations_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(hospital_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> AppResult<Json<Vec<BloodDonationRow>>> {
    Ok(Json(
        donation_service::list_recent_donations(&pool, &auth_user.id, &hospital_id).await?,
    ))
}

pub async fn hospital_requests_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(hospital_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> AppResult<Json<Vec<BloodRequestRow>>> {
    Ok(Json(
        blood_request_service::list_for_hospital(&pool, &auth_user.id, &hospital_id).await?,
    ))
}
