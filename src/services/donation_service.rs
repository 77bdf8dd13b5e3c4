use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{error, info};
use uuid::Uuid;

use crate::database::donation_repo::{self, NewDonation};
use crate::database::inventory_repo;
use crate::error::{AppError, AppResult};
use crate::models::{BloodDonationRow, BloodType};
use crate::services::hospital_service::ensure_owner;
use crate::services::validation;

pub const RECENT_DONATIONS_LIMIT: i64 = 50;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DonationInput {
    pub donor_name: Option<String>,
    pub donor_phone: Option<String>,
    pub donor_email: Option<String>,
    pub blood_type: String,
    pub units_donated: i64,
    pub donation_date: String,
    pub notes: Option<String>,
}

/// Records the donation and bumps the matching stock row in one transaction.
/// A missing stock row rolls everything back.
pub async fn record_donation(
    pool: &SqlitePool,
    auth_user_id: &str,
    hospital_id: &str,
    input: &DonationInput,
) -> AppResult<BloodDonationRow> {
    ensure_owner(pool, hospital_id, auth_user_id).await?;

    let blood_type = input
        .blood_type
        .parse::<BloodType>()
        .map_err(|e| AppError::validation(e.to_string()))?;
    validation::units_in_range(input.units_donated, 1, "units_donated")?;
    let donation_date = input.donation_date.trim();
    if donation_date.is_empty() {
        return Err(AppError::validation("donation_date is required"));
    }
    let donor_email = validation::optional_text(input.donor_email.as_deref());
    if let Some(email) = donor_email {
        if !validation::is_valid_email(email) {
            return Err(AppError::validation("donor_email must be a valid email"));
        }
    }

    let id = Uuid::new_v4().to_string();
    let donation = NewDonation {
        id: &id,
        hospital_id,
        donor_name: validation::optional_text(input.donor_name.as_deref()),
        donor_phone: validation::optional_text(input.donor_phone.as_deref()),
        donor_email,
        blood_type: blood_type.as_str(),
        units_donated: input.units_donated,
        donation_date,
        notes: validation::optional_text(input.notes.as_deref()),
    };

    let mut tx = pool.begin().await?;
    donation_repo::insert_donation(&mut tx, &donation).await?;
    let affected = inventory_repo::increment_units(
        &mut tx,
        hospital_id,
        blood_type.as_str(),
        input.units_donated,
    )
    .await?;

    if affected == 0 {
        error!(
            "🩸 Stock row missing for hospital {} type {}; donation {} rolled back",
            hospital_id, blood_type, id
        );
        tx.rollback().await?;
        return Err(AppError::Invariant(format!(
            "no stock row for hospital {} type {}",
            hospital_id, blood_type
        )));
    }
    tx.commit().await?;

    info!(
        "🩸 Donation {} recorded: hospital={}, type={}, units={}",
        id, hospital_id, blood_type, input.units_donated
    );

    donation_repo::load_donation(pool, &id)
        .await?
        .ok_or_else(|| AppError::Invariant(format!("donation {} vanished after commit", id)))
}

pub async fn list_recent_donations(
    pool: &SqlitePool,
    auth_user_id: &str,
    hospital_id: &str,
) -> AppResult<Vec<BloodDonationRow>> {
    ensure_owner(pool, hospital_id, auth_user_id).await?;
    Ok(donation_repo::list_recent_donations(pool, hospital_id, RECENT_DONATIONS_LIMIT).await?)
}
