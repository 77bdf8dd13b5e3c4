use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::database::hospital_repo::{self, NewHospital};

/// Fresh in-memory database with migrations applied. A single connection
/// keeps every query on the same in-memory database.
pub async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

/// One account per hospital: `h-1` belongs to `owner-1`, `h-river` to
/// `owner-river`, unless `owner` says otherwise.
pub struct HospitalFixture<'a> {
    pub id: &'a str,
    pub user_id: Option<&'a str>,
    pub name: &'a str,
    pub district: Option<&'a str>,
    pub coordinate: Option<(f64, f64)>,
}

impl<'a> HospitalFixture<'a> {
    pub fn new(id: &'a str, name: &'a str) -> Self {
        HospitalFixture {
            id,
            user_id: None,
            name,
            district: None,
            coordinate: None,
        }
    }

    pub fn owner(mut self, user_id: &'a str) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn district(mut self, district: &'a str) -> Self {
        self.district = Some(district);
        self
    }

    pub fn at(mut self, lat: f64, lon: f64) -> Self {
        self.coordinate = Some((lat, lon));
        self
    }

    pub async fn insert(self, pool: &SqlitePool) {
        let default_owner = format!("owner-{}", self.id.trim_start_matches("h-"));
        hospital_repo::insert_hospital_with_inventory(
            pool,
            &NewHospital {
                id: self.id,
                user_id: self.user_id.unwrap_or(&default_owner),
                name: self.name,
                address: "1 Main St",
                city: "Springfield",
                state: "IL",
                district: self.district,
                zip_code: "62701",
                phone: "555-0100",
                email: "bank@example.org",
                latitude: self.coordinate.map(|(lat, _)| lat),
                longitude: self.coordinate.map(|(_, lon)| lon),
            },
        )
        .await
        .unwrap();
    }
}

pub async fn set_stock(pool: &SqlitePool, hospital_id: &str, blood_type: &str, units: i64) {
    sqlx::query(
        "UPDATE blood_inventory SET units_available = ? WHERE hospital_id = ? AND blood_type = ?",
    )
    .bind(units)
    .bind(hospital_id)
    .bind(blood_type)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn set_stock_updated_at(
    pool: &SqlitePool,
    hospital_id: &str,
    blood_type: &str,
    at: &str,
) {
    sqlx::query(
        "UPDATE blood_inventory SET last_updated_at = ? WHERE hospital_id = ? AND blood_type = ?",
    )
    .bind(at)
    .bind(hospital_id)
    .bind(blood_type)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn deactivate(pool: &SqlitePool, hospital_id: &str) {
    sqlx::query("UPDATE hospitals SET is_active = 0 WHERE id = ?")
        .bind(hospital_id)
        .execute(pool)
        .await
        .unwrap();
}
