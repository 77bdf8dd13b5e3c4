use sqlx::{sqlite::SqliteArguments, Arguments, SqlitePool};

use crate::models::{BloodAvailabilityRow, DonationCenterRow};

/// SQL-side prefilters shared by both search modes. The exact radius check
/// happens after the rows are loaded.
#[derive(Debug, Default, Clone)]
pub struct CandidateFilters {
    pub district: Option<String>,
    pub name_pattern: Option<String>,
    pub lat_range: Option<(f64, f64)>,
    pub lon_range: Option<(f64, f64)>,
}

pub const SQL_BLOOD_AVAILABILITY_BASE: &str = r#"
SELECT
    h.id, h.name, h.address, h.city, h.state, h.district, h.phone, h.email,
    h.latitude, h.longitude,
    bi.blood_type, bi.units_available, bi.last_updated_at,
    (SELECT COUNT(*) FROM blood_donations bd
     WHERE bd.hospital_id = h.id AND bd.created_at >= datetime('now', '-30 days')) AS recent_donations,
    (SELECT COUNT(*) FROM blood_requests br
     WHERE br.hospital_id = h.id AND br.status = 'fulfilled'
       AND br.updated_at >= datetime('now', '-30 days')) AS recent_fulfillments
FROM hospitals h
JOIN blood_inventory bi ON h.id = bi.hospital_id
WHERE h.is_active = 1
    AND bi.blood_type = ?
    AND bi.units_available > 0
"#;

pub const SQL_DONATION_CENTER_BASE: &str = r#"
SELECT
    h.id, h.name, h.address, h.city, h.state, h.district, h.phone, h.email,
    h.latitude, h.longitude, h.updated_at,
    (SELECT COUNT(*) FROM blood_donations bd
     WHERE bd.hospital_id = h.id AND bd.created_at >= datetime('now', '-30 days')) AS recent_donations,
    (SELECT COUNT(*) FROM blood_requests br
     WHERE br.hospital_id = h.id AND br.status = 'fulfilled'
       AND br.updated_at >= datetime('now', '-30 days')) AS recent_fulfillments,
    bi.units_available AS requested_units
FROM hospitals h
LEFT JOIN blood_inventory bi ON (bi.hospital_id = h.id AND bi.blood_type = ?)
WHERE h.is_active = 1
"#;

fn push_filters<'q>(
    sql: &mut String,
    args: &mut SqliteArguments<'q>,
    filters: &'q CandidateFilters,
) -> sqlx::Result<()> {
    if let Some(district) = filters.district.as_deref() {
        sql.push_str(" AND LOWER(h.district) = LOWER(?)");
        args.add(district).map_err(sqlx::Error::Encode)?;
    }

    if let Some(pattern) = filters.name_pattern.as_deref() {
        sql.push_str(" AND LOWER(h.name) LIKE LOWER(?) ESCAPE '\\'");
        args.add(pattern).map_err(sqlx::Error::Encode)?;
    }

    if let Some((min_lat, max_lat)) = filters.lat_range {
        sql.push_str(" AND h.latitude BETWEEN ? AND ? AND h.longitude IS NOT NULL");
        args.add(min_lat).map_err(sqlx::Error::Encode)?;
        args.add(max_lat).map_err(sqlx::Error::Encode)?;
    }

    if let Some((min_lon, max_lon)) = filters.lon_range {
        sql.push_str(" AND h.longitude BETWEEN ? AND ?");
        args.add(min_lon).map_err(sqlx::Error::Encode)?;
        args.add(max_lon).map_err(sqlx::Error::Encode)?;
    }

    Ok(())
}

/// Stocked hospitals for one blood type, most recently updated stock first,
/// then largest stock.
pub async fn load_blood_availability(
    pool: &SqlitePool,
    blood_type: &str,
    filters: &CandidateFilters,
) -> sqlx::Result<Vec<BloodAvailabilityRow>> {
    let mut sql = String::from(SQL_BLOOD_AVAILABILITY_BASE);
    let mut args = SqliteArguments::default();
    args.add(blood_type).map_err(sqlx::Error::Encode)?;

    push_filters(&mut sql, &mut args, filters)?;

    sql.push_str(" ORDER BY bi.last_updated_at DESC, bi.units_available DESC, h.id ASC");

    sqlx::query_as_with::<_, BloodAvailabilityRow, _>(&sql, args)
        .fetch_all(pool)
        .await
}

/// Active hospitals ordered by name. `requested_type` only annotates rows.
pub async fn load_donation_centers(
    pool: &SqlitePool,
    requested_type: Option<&str>,
    filters: &CandidateFilters,
) -> sqlx::Result<Vec<DonationCenterRow>> {
    let mut sql = String::from(SQL_DONATION_CENTER_BASE);
    let mut args = SqliteArguments::default();
    args.add(requested_type).map_err(sqlx::Error::Encode)?; // JOIN param

    push_filters(&mut sql, &mut args, filters)?;

    sql.push_str(" ORDER BY h.name ASC, h.id ASC");

    sqlx::query_as_with::<_, DonationCenterRow, _>(&sql, args)
        .fetch_all(pool)
        .await
}
