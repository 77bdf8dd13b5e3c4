use serde::Serialize;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BloodDonationRow {
    pub id: String,
    pub hospital_id: String,
    pub donor_name: Option<String>,
    pub donor_phone: Option<String>,
    pub donor_email: Option<String>,
    pub blood_type: String,
    pub units_donated: i64,
    pub donation_date: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
