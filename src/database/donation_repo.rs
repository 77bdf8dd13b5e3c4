use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::models::BloodDonationRow;

pub struct NewDonation<'a> {
    pub id: &'a str,
    pub hospital_id: &'a str,
    pub donor_name: Option<&'a str>,
    pub donor_phone: Option<&'a str>,
    pub donor_email: Option<&'a str>,
    pub blood_type: &'a str,
    pub units_donated: i64,
    pub donation_date: &'a str,
    pub notes: Option<&'a str>,
}

const SQL_INSERT_DONATION: &str = r#"
INSERT INTO blood_donations (
  id,
  hospital_id,
  donor_name,
  donor_phone,
  donor_email,
  blood_type,
  units_donated,
  donation_date,
  notes
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub async fn insert_donation(
    tx: &mut Transaction<'_, Sqlite>,
    donation: &NewDonation<'_>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_DONATION)
        .bind(donation.id)
        .bind(donation.hospital_id)
        .bind(donation.donor_name)
        .bind(donation.donor_phone)
        .bind(donation.donor_email)
        .bind(donation.blood_type)
        .bind(donation.units_donated)
        .bind(donation.donation_date)
        .bind(donation.notes)
        .execute(&mut **tx)
        .await?;
    Ok(res.rows_affected())
}

const SQL_LOAD_DONATION: &str = r#"
SELECT
  id, hospital_id, donor_name, donor_phone, donor_email, blood_type,
  units_donated, donation_date, notes, created_at, updated_at
FROM blood_donations
WHERE id = ?
"#;

pub async fn load_donation(
    pool: &SqlitePool,
    donation_id: &str,
) -> sqlx::Result<Option<BloodDonationRow>> {
    sqlx::query_as::<_, BloodDonationRow>(SQL_LOAD_DONATION)
        .bind(donation_id)
        .fetch_optional(pool)
        .await
}

const SQL_LIST_RECENT_DONATIONS: &str = r#"
SELECT
  id, hospital_id, donor_name, donor_phone, donor_email, blood_type,
  units_donated, donation_date, notes, created_at, updated_at
FROM blood_donations
WHERE hospital_id = ?
ORDER BY donation_date DESC, created_at DESC
LIMIT ?
"#;

pub async fn list_recent_donations(
    pool: &SqlitePool,
    hospital_id: &str,
    limit: i64,
) -> sqlx::Result<Vec<BloodDonationRow>> {
    sqlx::query_as::<_, BloodDonationRow>(SQL_LIST_RECENT_DONATIONS)
        .bind(hospital_id)
        .bind(limit)
        .fetch_all(pool)
        .await
}
