pub mod blood_request_repo;
pub mod donation_repo;
pub mod hospital_repo;
pub mod inventory_repo;
pub mod search_repo;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Opens the pool, creating the database file when missing, and applies the
/// bundled migrations.
pub async fn connect(db_url: &str) -> sqlx::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(db_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}
