use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;

use crate::database::search_repo::{self, CandidateFilters};
use crate::error::{AppError, AppResult};
use crate::models::{BloodAvailabilityRow, BloodType, DonationCenterRow};
use crate::services::geo;

pub const DEFAULT_RADIUS_KM: f64 = 50.0;
pub const MIN_RADIUS_KM: f64 = 1.0;
pub const MAX_RADIUS_KM: f64 = 100.0;

// Placeholder priority reported for every requested type in donor search.
const DEFAULT_NEED_PRIORITY: &str = "medium";

/// Raw query-string parameters shared by both search endpoints.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct SearchParams {
    pub blood_type: Option<String>,
    pub district: Option<String>,
    pub hospital_name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Blood type is a hard filter on stocked units; results ordered by
    /// stock recency, then unit count.
    FindBlood,
    /// Blood type only annotates results; results ordered by hospital name.
    FindDonationCenter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub mode: SearchMode,
    pub blood_type: Option<BloodType>,
    pub district: Option<String>,
    pub name: Option<String>,
    pub origin: Option<(f64, f64)>,
    pub radius_km: Option<f64>,
}

impl SearchQuery {
    /// Radius constraint in force, if any. Needs both an origin and a radius.
    pub fn radius_filter(&self) -> Option<((f64, f64), f64)> {
        self.origin.zip(self.radius_km)
    }

    fn candidate_filters(&self) -> CandidateFilters {
        let bbox = self
            .radius_filter()
            .map(|((lat, lon), radius)| geo::bounding_box(lat, lon, radius));

        CandidateFilters {
            district: self.district.clone(),
            name_pattern: self.name.as_deref().map(like_contains_pattern),
            lat_range: bbox.map(|b| (b.min_lat, b.max_lat)),
            lon_range: bbox.and_then(|b| b.lon_range),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Checks the raw parameters for `mode`. Nothing is queried when this fails.
pub fn validate(params: &SearchParams, mode: SearchMode) -> AppResult<SearchQuery> {
    // Not trimmed: a trailing space may be a form-decoded `+`.
    let blood_type = params
        .blood_type
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|raw| {
            raw.parse::<BloodType>()
                .map_err(|e| AppError::validation(e.to_string()))
        })
        .transpose()?;

    if mode == SearchMode::FindBlood && blood_type.is_none() {
        return Err(AppError::validation("blood_type is required"));
    }

    let origin = match (params.lat, params.lng) {
        (Some(lat), Some(lng)) => {
            if !geo::is_valid_coordinate(lat, lng) {
                return Err(AppError::validation("lat/lng out of range"));
            }
            Some((lat, lng))
        }
        (None, None) => None,
        _ => return Err(AppError::validation("lat and lng must be given together")),
    };

    if let Some(radius) = params.radius {
        if !(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&radius) {
            return Err(AppError::validation(format!(
                "radius must be between {} and {} km",
                MIN_RADIUS_KM, MAX_RADIUS_KM
            )));
        }
    }

    let radius_km = match mode {
        SearchMode::FindBlood => Some(params.radius.unwrap_or(DEFAULT_RADIUS_KM)),
        SearchMode::FindDonationCenter => params.radius,
    };

    Ok(SearchQuery {
        mode,
        blood_type,
        district: non_empty(params.district.as_deref()),
        name: non_empty(params.hospital_name.as_deref()),
        origin,
        radius_km,
    })
}

/// `%needle%` with wildcards in the needle escaped. Case folding happens in SQL
/// so both sides go through the same `LOWER`.
pub fn like_contains_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

/// Rows that carry a hospital coordinate and a derived distance.
pub trait Located {
    fn coordinate(&self) -> Option<(f64, f64)>;
    fn set_distance_km(&mut self, distance: Option<f64>);
}

impl Located for BloodAvailabilityRow {
    fn coordinate(&self) -> Option<(f64, f64)> {
        geo::coordinate(self.latitude, self.longitude)
    }

    fn set_distance_km(&mut self, distance: Option<f64>) {
        self.distance_km = distance;
    }
}

impl Located for DonationCenterRow {
    fn coordinate(&self) -> Option<(f64, f64)> {
        geo::coordinate(self.latitude, self.longitude)
    }

    fn set_distance_km(&mut self, distance: Option<f64>) {
        self.distance_km = distance;
    }
}

/// Attaches distances and drops rows outside the radius. Keeps the incoming
/// order; distance is never a sort key.
pub fn apply_geo<T: Located>(rows: Vec<T>, query: &SearchQuery) -> Vec<T> {
    let Some((lat0, lon0)) = query.origin else {
        return rows;
    };
    let radius = query.radius_km;

    let mut kept = Vec::with_capacity(rows.len());
    for mut row in rows {
        let distance = row
            .coordinate()
            .map(|(lat1, lon1)| geo::haversine_km(lat0, lon0, lat1, lon1));

        if let Some(radius) = radius {
            match distance {
                Some(d) if d <= radius => {}
                _ => continue,
            }
        }

        row.set_distance_km(distance);
        kept.push(row);
    }
    kept
}

pub async fn find_blood(
    pool: &SqlitePool,
    query: &SearchQuery,
) -> AppResult<Vec<BloodAvailabilityRow>> {
    let blood_type = query
        .blood_type
        .ok_or_else(|| AppError::validation("blood_type is required"))?;

    let filters = query.candidate_filters();
    let rows = search_repo::load_blood_availability(pool, blood_type.as_str(), &filters).await?;
    let candidates = rows.len();
    let results = apply_geo(rows, query);

    debug!(
        "find_blood type={} candidates={} results={}",
        blood_type,
        candidates,
        results.len()
    );
    Ok(results)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BloodNeed {
    pub blood_type: BloodType,
    pub units_available: Option<i64>,
    pub priority: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DonationCenterView {
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
    pub distance: Option<f64>,
    pub recent_donations: i64,
    pub recent_fulfillments: i64,
    pub blood_needs: Vec<BloodNeed>,
    pub last_updated_at: String,
}

fn to_donation_center_view(row: DonationCenterRow, requested: Option<BloodType>) -> DonationCenterView {
    let blood_needs = requested
        .map(|blood_type| BloodNeed {
            blood_type,
            units_available: row.requested_units,
            priority: DEFAULT_NEED_PRIORITY,
        })
        .into_iter()
        .collect();

    DonationCenterView {
        id: row.id,
        name: row.name,
        address: row.address,
        city: row.city,
        state: row.state,
        district: row.district,
        phone: row.phone,
        email: row.email,
        latitude: row.latitude,
        longitude: row.longitude,
        distance: row.distance_km,
        recent_donations: row.recent_donations,
        recent_fulfillments: row.recent_fulfillments,
        blood_needs,
        last_updated_at: row.updated_at,
    }
}

pub async fn find_donation_centers(
    pool: &SqlitePool,
    query: &SearchQuery,
) -> AppResult<Vec<DonationCenterView>> {
    let filters = query.candidate_filters();
    let requested = query.blood_type.map(BloodType::as_str);
    let rows = search_repo::load_donation_centers(pool, requested, &filters).await?;

    let results = apply_geo(rows, query)
        .into_iter()
        .map(|row| to_donation_center_view(row, query.blood_type))
        .collect::<Vec<_>>();

    debug!("find_donation_centers results={}", results.len());
    Ok(results)
}
