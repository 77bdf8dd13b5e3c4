use serde::Serialize;

// Find-blood match: an active hospital joined with its stock row for the requested type.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BloodAvailabilityRow {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub district: Option<String>,
    pub phone: String,
    pub email: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub blood_type: String,
    pub units_available: i64,
    pub last_updated_at: String,
    pub recent_donations: i64,
    pub recent_fulfillments: i64,
    #[sqlx(skip)]
    #[serde(rename = "distance")]
    pub distance_km: Option<f64>,
}

// Find-donation-center candidate. `requested_units` is only populated when the
// query names a blood type.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DonationCenterRow {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub district: Option<String>,
    pub phone: String,
    pub email: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub updated_at: String,
    pub recent_donations: i64,
    pub recent_fulfillments: i64,
    pub requested_units: Option<i64>,
    #[sqlx(skip)]
    pub distance_km: Option<f64>,
}
