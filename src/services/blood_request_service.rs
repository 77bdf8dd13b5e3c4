use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::database::blood_request_repo::{self, NewBloodRequest};
use crate::database::inventory_repo;
use crate::error::{AppError, AppResult};
use crate::models::{BloodRequestRow, BloodType, RequestStatus, Urgency};
use crate::services::hospital_service::ensure_owner;
use crate::services::validation;

const REQUEST_NOT_FOUND: &str = "Request not found or unauthorized";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BloodRequestInput {
    pub requester_name: String,
    pub requester_phone: String,
    pub requester_email: String,
    pub blood_type: String,
    pub units_needed: i64,
    pub urgency: String,
    pub hospital_id: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StatusInput {
    pub status: String, // approved|fulfilled|cancelled
}

/// Public request against a hospital's stock. The stock is checked, not reserved.
pub async fn create_request(
    pool: &SqlitePool,
    input: &BloodRequestInput,
) -> AppResult<BloodRequestRow> {
    let requester_name = validation::required_text(&input.requester_name, "Name is required")?;
    let requester_phone = validation::required_text(&input.requester_phone, "Phone is required")?;
    let requester_email =
        validation::required_text(&input.requester_email, "Valid email is required")?;
    if !validation::is_valid_email(requester_email) {
        return Err(AppError::validation("Valid email is required"));
    }
    let blood_type = input
        .blood_type
        .parse::<BloodType>()
        .map_err(|e| AppError::validation(e.to_string()))?;
    validation::units_in_range(input.units_needed, 1, "units_needed")?;
    let urgency = Urgency::parse(&input.urgency)
        .ok_or_else(|| AppError::validation("urgency must be low, medium, high or critical"))?;
    let hospital_id = validation::required_text(&input.hospital_id, "hospital_id is required")?;

    let Some(available) =
        inventory_repo::load_units(pool, hospital_id, blood_type.as_str()).await?
    else {
        return Err(AppError::NotFoundOrUnauthorized(
            "Hospital or blood type not found",
        ));
    };

    if available < input.units_needed {
        return Err(AppError::Conflict(format!(
            "Insufficient blood units available. Only {} units available.",
            available
        )));
    }

    let id = Uuid::new_v4().to_string();
    blood_request_repo::insert_blood_request(
        pool,
        &NewBloodRequest {
            id: &id,
            requester_name,
            requester_phone,
            requester_email,
            blood_type: blood_type.as_str(),
            units_needed: input.units_needed,
            urgency: urgency.as_str(),
            hospital_id,
            notes: validation::optional_text(input.notes.as_deref()),
        },
    )
    .await?;

    info!(
        "🩸 Blood request {} for {} x{} ({}) at hospital {}",
        id,
        blood_type,
        input.units_needed,
        urgency.as_str(),
        hospital_id
    );

    blood_request_repo::load_blood_request(pool, &id)
        .await?
        .ok_or_else(|| AppError::Invariant(format!("blood request {} vanished after insert", id)))
}

pub async fn list_for_hospital(
    pool: &SqlitePool,
    auth_user_id: &str,
    hospital_id: &str,
) -> AppResult<Vec<BloodRequestRow>> {
    ensure_owner(pool, hospital_id, auth_user_id).await?;
    Ok(blood_request_repo::list_for_hospital(pool, hospital_id).await?)
}

pub async fn update_status(
    pool: &SqlitePool,
    auth_user_id: &str,
    request_id: &str,
    input: &StatusInput,
) -> AppResult<RequestStatus> {
    let status = RequestStatus::parse_transition(&input.status)
        .ok_or_else(|| AppError::validation("status must be approved, fulfilled or cancelled"))?;

    let owner = blood_request_repo::load_request_owner(pool, request_id).await?;
    if owner.as_deref() != Some(auth_user_id) {
        return Err(AppError::NotFoundOrUnauthorized(REQUEST_NOT_FOUND));
    }

    blood_request_repo::update_status(pool, request_id, status.as_str()).await?;
    info!("🩸 Blood request {} -> {}", request_id, status.as_str());
    Ok(status)
}
