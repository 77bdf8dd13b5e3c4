use serde::Serialize;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct HospitalRow {
    pub id: String,
    pub user_id: String,
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
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}
