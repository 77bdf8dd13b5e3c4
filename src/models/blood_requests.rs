use serde::Serialize;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BloodRequestRow {
    pub id: String,
    pub requester_name: String,
    pub requester_phone: String,
    pub requester_email: String,
    pub blood_type: String,
    pub units_needed: i64,
    pub urgency: String, // low|medium|high|critical
    pub hospital_id: String,
    pub status: String, // pending|approved|fulfilled|cancelled
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
