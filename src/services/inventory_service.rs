use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::database::inventory_repo;
use crate::error::{AppError, AppResult};
use crate::models::{BloodInventoryRow, BloodType};
use crate::services::hospital_service::ensure_owner;
use crate::services::validation;

#[derive(Debug, Deserialize, Clone)]
pub struct InventoryEntryInput {
    pub blood_type: String,
    pub units_available: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryEntry {
    pub blood_type: BloodType,
    pub units_available: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InventoryUpdateReport {
    pub updated: usize,
    pub missing: usize,
}

/// Rejects the whole batch if any entry is malformed; nothing is written.
pub fn validate_entries(input: &[InventoryEntryInput]) -> AppResult<Vec<InventoryEntry>> {
    input
        .iter()
        .map(|item| {
            let blood_type = item
                .blood_type
                .parse::<BloodType>()
                .map_err(|e| AppError::validation(e.to_string()))?;
            let units_available = validation::units_in_range(
                item.units_available,
                0,
                &format!("units_available for {}", blood_type),
            )?;
            Ok(InventoryEntry {
                blood_type,
                units_available,
            })
        })
        .collect()
}

pub async fn load_inventory(
    pool: &SqlitePool,
    auth_user_id: &str,
    hospital_id: &str,
) -> AppResult<Vec<BloodInventoryRow>> {
    ensure_owner(pool, hospital_id, auth_user_id).await?;
    Ok(inventory_repo::list_inventory(pool, hospital_id).await?)
}

/// Applies each entry as its own statement. A store failure mid-batch leaves
/// the earlier entries applied.
pub async fn update_inventory(
    pool: &SqlitePool,
    auth_user_id: &str,
    hospital_id: &str,
    input: &[InventoryEntryInput],
) -> AppResult<InventoryUpdateReport> {
    ensure_owner(pool, hospital_id, auth_user_id).await?;
    let entries = validate_entries(input)?;

    let mut report = InventoryUpdateReport::default();
    for entry in entries {
        let affected = inventory_repo::set_units(
            pool,
            hospital_id,
            entry.blood_type.as_str(),
            entry.units_available,
        )
        .await?;

        if affected == 0 {
            warn!(
                "🩸 Stock row missing for hospital {} type {}",
                hospital_id, entry.blood_type
            );
            report.missing += 1;
        } else {
            report.updated += 1;
        }
    }

    info!(
        "🩸 Inventory update for hospital {}: updated={}, missing={}",
        hospital_id, report.updated, report.missing
    );
    Ok(report)
}
