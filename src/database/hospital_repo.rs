use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::models::{BloodType, HospitalRow};

pub struct NewHospital<'a> {
    pub id: &'a str,
    pub user_id: &'a str,
    pub name: &'a str,
    pub address: &'a str,
    pub city: &'a str,
    pub state: &'a str,
    pub district: Option<&'a str>,
    pub zip_code: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

const SQL_INSERT_HOSPITAL: &str = r#"
INSERT INTO hospitals (
  id,
  user_id,
  name,
  address,
  city,
  state,
  district,
  zip_code,
  phone,
  email,
  latitude,
  longitude
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const SQL_SEED_INVENTORY_ROW: &str = r#"
INSERT INTO blood_inventory (hospital_id, blood_type, units_available)
VALUES (?, ?, 0)
"#;

/// Inserts the hospital and its eight zero-unit stock rows in one transaction.
pub async fn insert_hospital_with_inventory(
    pool: &SqlitePool,
    hospital: &NewHospital<'_>,
) -> sqlx::Result<()> {
    let mut tx: Transaction<'_, Sqlite> = pool.begin().await?;

    sqlx::query(SQL_INSERT_HOSPITAL)
        .bind(hospital.id)
        .bind(hospital.user_id)
        .bind(hospital.name)
        .bind(hospital.address)
        .bind(hospital.city)
        .bind(hospital.state)
        .bind(hospital.district)
        .bind(hospital.zip_code)
        .bind(hospital.phone)
        .bind(hospital.email)
        .bind(hospital.latitude)
        .bind(hospital.longitude)
        .execute(&mut *tx)
        .await?;

    for blood_type in BloodType::ALL {
        sqlx::query(SQL_SEED_INVENTORY_ROW)
            .bind(hospital.id)
            .bind(blood_type.as_str())
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await
}

const SQL_UPDATE_HOSPITAL: &str = r#"
UPDATE hospitals
SET name = ?, address = ?, city = ?, state = ?, district = ?, zip_code = ?,
    phone = ?, email = ?, latitude = ?, longitude = ?,
    is_active = COALESCE(?, is_active), updated_at = CURRENT_TIMESTAMP
WHERE id = ?
"#;

/// Profile fields are always written; `is_active` only when given.
pub async fn update_hospital(
    pool: &SqlitePool,
    hospital: &NewHospital<'_>,
    is_active: Option<bool>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_HOSPITAL)
        .bind(hospital.name)
        .bind(hospital.address)
        .bind(hospital.city)
        .bind(hospital.state)
        .bind(hospital.district)
        .bind(hospital.zip_code)
        .bind(hospital.phone)
        .bind(hospital.email)
        .bind(hospital.latitude)
        .bind(hospital.longitude)
        .bind(is_active)
        .bind(hospital.id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_LOAD_HOSPITAL: &str = r#"
SELECT
  id, user_id, name, address, city, state, district, zip_code, phone, email,
  latitude, longitude, is_active, created_at, updated_at
FROM hospitals
WHERE id = ?
"#;

pub async fn load_hospital(pool: &SqlitePool, hospital_id: &str) -> sqlx::Result<Option<HospitalRow>> {
    sqlx::query_as::<_, HospitalRow>(SQL_LOAD_HOSPITAL)
        .bind(hospital_id)
        .fetch_optional(pool)
        .await
}

const SQL_LIST_HOSPITALS_FOR_USER: &str = r#"
SELECT
  id, user_id, name, address, city, state, district, zip_code, phone, email,
  latitude, longitude, is_active, created_at, updated_at
FROM hospitals
WHERE user_id = ?
ORDER BY created_at DESC, id DESC
"#;

pub async fn list_hospitals_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Vec<HospitalRow>> {
    sqlx::query_as::<_, HospitalRow>(SQL_LIST_HOSPITALS_FOR_USER)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

const SQL_OWNED_HOSPITAL_ID: &str = r#"
SELECT id
FROM hospitals
WHERE id = ? AND user_id = ?
"#;

pub async fn is_owned_by(pool: &SqlitePool, hospital_id: &str, user_id: &str) -> sqlx::Result<bool> {
    let found = sqlx::query_scalar::<_, String>(SQL_OWNED_HOSPITAL_ID)
        .bind(hospital_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

const SQL_COUNT_HOSPITALS_FOR_USER: &str = r#"
SELECT COUNT(*)
FROM hospitals
WHERE user_id = ?
"#;

pub async fn count_hospitals_for_user(pool: &SqlitePool, user_id: &str) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_HOSPITALS_FOR_USER)
        .bind(user_id)
        .fetch_one(pool)
        .await
}

const SQL_LIST_DISTRICTS: &str = r#"
SELECT DISTINCT district
FROM hospitals
WHERE district IS NOT NULL AND district != '' AND is_active = 1
ORDER BY district
"#;

pub async fn list_active_districts(pool: &SqlitePool) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(SQL_LIST_DISTRICTS)
        .fetch_all(pool)
        .await
}
