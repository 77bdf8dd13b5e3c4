use sqlx::SqlitePool;

use crate::models::BloodRequestRow;

pub struct NewBloodRequest<'a> {
    pub id: &'a str,
    pub requester_name: &'a str,
    pub requester_phone: &'a str,
    pub requester_email: &'a str,
    pub blood_type: &'a str,
    pub units_needed: i64,
    pub urgency: &'a str,
    pub hospital_id: &'a str,
    pub notes: Option<&'a str>,
}

const SQL_INSERT_BLOOD_REQUEST: &str = r#"
INSERT INTO blood_requests (
  id,
  requester_name,
  requester_phone,
  requester_email,
  blood_type,
  units_needed,
  urgency,
  hospital_id,
  notes
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub async fn insert_blood_request(
    pool: &SqlitePool,
    req: &NewBloodRequest<'_>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_BLOOD_REQUEST)
        .bind(req.id)
        .bind(req.requester_name)
        .bind(req.requester_phone)
        .bind(req.requester_email)
        .bind(req.blood_type)
        .bind(req.units_needed)
        .bind(req.urgency)
        .bind(req.hospital_id)
        .bind(req.notes)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_SELECT_BLOOD_REQUEST: &str = r#"
SELECT
  id, requester_name, requester_phone, requester_email, blood_type, units_needed,
  urgency, hospital_id, status, notes, created_at, updated_at
FROM blood_requests
"#;

pub async fn load_blood_request(
    pool: &SqlitePool,
    request_id: &str,
) -> sqlx::Result<Option<BloodRequestRow>> {
    let sql = format!("{} WHERE id = ?", SQL_SELECT_BLOOD_REQUEST);
    sqlx::query_as::<_, BloodRequestRow>(&sql)
        .bind(request_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_for_hospital(
    pool: &SqlitePool,
    hospital_id: &str,
) -> sqlx::Result<Vec<BloodRequestRow>> {
    let sql = format!(
        "{} WHERE hospital_id = ? ORDER BY created_at DESC, id DESC",
        SQL_SELECT_BLOOD_REQUEST
    );
    sqlx::query_as::<_, BloodRequestRow>(&sql)
        .bind(hospital_id)
        .fetch_all(pool)
        .await
}

const SQL_LOAD_REQUEST_OWNER: &str = r#"
SELECT h.user_id
FROM blood_requests br
JOIN hospitals h ON h.id = br.hospital_id
WHERE br.id = ?
"#;

pub async fn load_request_owner(
    pool: &SqlitePool,
    request_id: &str,
) -> sqlx::Result<Option<String>> {
    sqlx::query_scalar::<_, String>(SQL_LOAD_REQUEST_OWNER)
        .bind(request_id)
        .fetch_optional(pool)
        .await
}

const SQL_UPDATE_REQUEST_STATUS: &str = r#"
UPDATE blood_requests
SET status = ?, updated_at = CURRENT_TIMESTAMP
WHERE id = ?
"#;

pub async fn update_status(pool: &SqlitePool, request_id: &str, status: &str) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_REQUEST_STATUS)
        .bind(status)
        .bind(request_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
