use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::BloodAvailabilityRow;
use crate::services::hospital_service;
use crate::services::search_service::{self, DonationCenterView, SearchMode, SearchParams};

pub async fn search_handler(
    State(pool): State<SqlitePool>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> AppResult<Json<Vec<BloodAvailabilityRow>>> {
    let Query(params) = query.map_err(|e| AppError::validation(e.body_text()))?;
    let query = search_service::validate(&params, SearchMode::FindBlood)?;
    let results = search_service::find_blood(&pool, &query).await?;
    Ok(Json(results))
}

pub async fn donor_search_handler(
    State(pool): State<SqlitePool>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> AppResult<Json<Vec<DonationCenterView>>> {
    let Query(params) = query.map_err(|e| AppError::validation(e.body_text()))?;
    let query = search_service::validate(&params, SearchMode::FindDonationCenter)?;
    let results = search_service::find_donation_centers(&pool, &query).await?;
    Ok(Json(results))
}

pub async fn districts_handler(State(pool): State<SqlitePool>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(hospital_service::list_districts(&pool).await?))
}
