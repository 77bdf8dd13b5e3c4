use serde::Serialize;

// One row per (hospital_id, blood_type); seeded for all eight types at registration.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BloodInventoryRow {
    pub hospital_id: String,
    pub blood_type: String,
    pub units_available: i64,
    pub last_updated_at: String,
    pub created_at: String,
    pub updated_at: String,
}
