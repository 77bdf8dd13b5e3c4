use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::database::hospital_repo::{self, NewHospital};
use crate::error::{AppError, AppResult};
use crate::models::HospitalRow;
use crate::services::{geo, validation};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct HospitalInput {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub district: Option<String>,
    pub zip_code: String,
    pub phone: String,
    pub email: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Only honoured on update.
    pub is_active: Option<bool>,
}

struct ValidHospital<'a> {
    name: &'a str,
    address: &'a str,
    city: &'a str,
    state: &'a str,
    district: Option<&'a str>,
    zip_code: &'a str,
    phone: &'a str,
    email: &'a str,
    coordinate: Option<(f64, f64)>,
}

impl<'a> ValidHospital<'a> {
    fn as_new(&self, id: &'a str, user_id: &'a str) -> NewHospital<'a> {
        NewHospital {
            id,
            user_id,
            name: self.name,
            address: self.address,
            city: self.city,
            state: self.state,
            district: self.district,
            zip_code: self.zip_code,
            phone: self.phone,
            email: self.email,
            latitude: self.coordinate.map(|(lat, _)| lat),
            longitude: self.coordinate.map(|(_, lon)| lon),
        }
    }
}

pub const HOSPITAL_NOT_FOUND: &str = "Hospital not found or unauthorized";

/// Ownership check shared by every hospital-scoped operation.
pub async fn ensure_owner(pool: &SqlitePool, hospital_id: &str, user_id: &str) -> AppResult<()> {
    if hospital_repo::is_owned_by(pool, hospital_id, user_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFoundOrUnauthorized(HOSPITAL_NOT_FOUND))
    }
}

fn validate(input: &HospitalInput) -> AppResult<ValidHospital<'_>> {
    let email = validation::required_text(&input.email, "Valid email is required")?;
    if !validation::is_valid_email(email) {
        return Err(AppError::validation("Valid email is required"));
    }

    let coordinate = match (input.latitude, input.longitude) {
        (Some(lat), Some(lon)) => {
            if !geo::is_valid_coordinate(lat, lon) {
                return Err(AppError::validation("latitude/longitude out of range"));
            }
            Some((lat, lon))
        }
        (None, None) => None,
        _ => {
            return Err(AppError::validation(
                "latitude and longitude must be given together",
            ))
        }
    };

    Ok(ValidHospital {
        name: validation::required_text(&input.name, "Hospital name is required")?,
        address: validation::required_text(&input.address, "Address is required")?,
        city: validation::required_text(&input.city, "City is required")?,
        state: validation::required_text(&input.state, "State is required")?,
        district: validation::optional_text(input.district.as_deref()),
        zip_code: validation::required_text(&input.zip_code, "ZIP code is required")?,
        phone: validation::required_text(&input.phone, "Phone number is required")?,
        email,
        coordinate,
    })
}

const ALREADY_REGISTERED: &str = "User already has a registered hospital";

/// A concurrent registration for the same account trips the unique index.
pub(crate) fn registration_error(err: sqlx::Error) -> AppError {
    let unique_violation = matches!(&err, sqlx::Error::Database(db) if db.is_unique_violation());
    if unique_violation {
        AppError::Conflict(ALREADY_REGISTERED.to_string())
    } else {
        AppError::Store(err)
    }
}

/// One hospital per account; all eight stock rows are seeded with zero units.
pub async fn register_hospital(
    pool: &SqlitePool,
    auth_user_id: &str,
    input: &HospitalInput,
) -> AppResult<HospitalRow> {
    let valid = validate(input)?;

    if hospital_repo::count_hospitals_for_user(pool, auth_user_id).await? > 0 {
        return Err(AppError::Conflict(ALREADY_REGISTERED.to_string()));
    }

    let id = Uuid::new_v4().to_string();
    hospital_repo::insert_hospital_with_inventory(pool, &valid.as_new(&id, auth_user_id))
        .await
        .map_err(registration_error)?;
    info!("🏥 Hospital {} registered by {}", id, auth_user_id);

    hospital_repo::load_hospital(pool, &id)
        .await?
        .ok_or_else(|| AppError::Invariant(format!("hospital {} vanished after insert", id)))
}

pub async fn update_hospital(
    pool: &SqlitePool,
    auth_user_id: &str,
    hospital_id: &str,
    input: &HospitalInput,
) -> AppResult<HospitalRow> {
    ensure_owner(pool, hospital_id, auth_user_id).await?;
    let valid = validate(input)?;

    hospital_repo::update_hospital(
        pool,
        &valid.as_new(hospital_id, auth_user_id),
        input.is_active,
    )
    .await?;

    hospital_repo::load_hospital(pool, hospital_id)
        .await?
        .ok_or(AppError::NotFoundOrUnauthorized(HOSPITAL_NOT_FOUND))
}

pub async fn list_my_hospitals(pool: &SqlitePool, auth_user_id: &str) -> AppResult<Vec<HospitalRow>> {
    Ok(hospital_repo::list_hospitals_for_user(pool, auth_user_id).await?)
}

pub async fn list_districts(pool: &SqlitePool) -> AppResult<Vec<String>> {
    Ok(hospital_repo::list_active_districts(pool).await?)
}
