use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::models::BloodInventoryRow;

const SQL_LIST_INVENTORY: &str = r#"
SELECT hospital_id, blood_type, units_available, last_updated_at, created_at, updated_at
FROM blood_inventory
WHERE hospital_id = ?
ORDER BY blood_type
"#;

pub async fn list_inventory(
    pool: &SqlitePool,
    hospital_id: &str,
) -> sqlx::Result<Vec<BloodInventoryRow>> {
    sqlx::query_as::<_, BloodInventoryRow>(SQL_LIST_INVENTORY)
        .bind(hospital_id)
        .fetch_all(pool)
        .await
}

const SQL_LOAD_UNITS: &str = r#"
SELECT units_available
FROM blood_inventory
WHERE hospital_id = ? AND blood_type = ?
"#;

pub async fn load_units(
    pool: &SqlitePool,
    hospital_id: &str,
    blood_type: &str,
) -> sqlx::Result<Option<i64>> {
    sqlx::query_scalar::<_, i64>(SQL_LOAD_UNITS)
        .bind(hospital_id)
        .bind(blood_type)
        .fetch_optional(pool)
        .await
}

const SQL_SET_UNITS: &str = r#"
UPDATE blood_inventory
SET units_available = ?, last_updated_at = CURRENT_TIMESTAMP, updated_at = CURRENT_TIMESTAMP
WHERE hospital_id = ? AND blood_type = ?
"#;

pub async fn set_units(
    pool: &SqlitePool,
    hospital_id: &str,
    blood_type: &str,
    units: i64,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_SET_UNITS)
        .bind(units)
        .bind(hospital_id)
        .bind(blood_type)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

// Single statement so concurrent donations cannot lose an increment.
const SQL_INCREMENT_UNITS: &str = r#"
UPDATE blood_inventory
SET units_available = units_available + ?, last_updated_at = CURRENT_TIMESTAMP, updated_at = CURRENT_TIMESTAMP
WHERE hospital_id = ? AND blood_type = ?
"#;

pub async fn increment_units(
    tx: &mut Transaction<'_, Sqlite>,
    hospital_id: &str,
    blood_type: &str,
    units: i64,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INCREMENT_UNITS)
        .bind(units)
        .bind(hospital_id)
        .bind(blood_type)
        .execute(&mut **tx)
        .await?;
    Ok(res.rows_affected())
}
