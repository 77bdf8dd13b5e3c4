pub const EARTH_RADIUS_KM: f64 = 6371.0;

// Conservative: a degree of latitude is ~111.19 km, so dividing by 111 widens the box.
const KM_PER_DEGREE: f64 = 111.0;

/// Great-circle distance in kilometers between two points given in decimal
/// degrees.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = ((dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    /// `None` when a longitude window would wrongly cut off matches: the box
    /// touches a pole or crosses the antimeridian.
    pub lon_range: Option<(f64, f64)>,
}

/// Coarse box containing every point within `radius_km` of the center.
pub fn bounding_box(lat: f64, lon: f64, radius_km: f64) -> BoundingBox {
    let lat_change = radius_km / KM_PER_DEGREE;
    let min_lat = lat - lat_change;
    let max_lat = lat + lat_change;

    let lon_range = if min_lat <= -90.0 || max_lat >= 90.0 {
        None
    } else {
        // Widest longitude spread is on the poleward edge of the box.
        let edge_lat = min_lat.abs().max(max_lat.abs());
        let lon_change = lat_change / edge_lat.to_radians().cos();
        let (min_lon, max_lon) = (lon - lon_change, lon + lon_change);
        if min_lon < -180.0 || max_lon > 180.0 {
            None
        } else {
            Some((min_lon, max_lon))
        }
    };

    BoundingBox {
        min_lat,
        max_lat,
        lon_range,
    }
}

pub fn is_valid_coordinate(lat: f64, lon: f64) -> bool {
    lat.is_finite() && lon.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

/// A coordinate only counts when both halves are present.
pub fn coordinate(lat: Option<f64>, lon: Option<f64>) -> Option<(f64, f64)> {
    lat.zip(lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero_apart() {
        assert_eq!(haversine_km(52.37, 4.89, 52.37, 4.89), 0.0);
        assert_eq!(haversine_km(-33.9, 151.2, -33.9, 151.2), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = haversine_km(51.5074, -0.1278, 48.8566, 2.3522);
        let ba = haversine_km(48.8566, 2.3522, 51.5074, -0.1278);
        assert!((ab - ba).abs() < 1e-9);
        // London to Paris is roughly 343 km.
        assert!((ab - 343.5).abs() < 2.0, "got {}", ab);
    }

    #[test]
    fn antipodal_points_are_half_the_circumference_apart() {
        let d = haversine_km(0.0, 0.0, 0.0, 180.0);
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((d - half).abs() < 1e-6);
        assert!((d - 20015.0).abs() < 1.0);
    }

    #[test]
    fn crosses_the_date_line_naturally() {
        let d = haversine_km(0.0, 179.9, 0.0, -179.9);
        assert!(d > 22.0 && d < 23.0, "got {}", d);
    }

    #[test]
    fn bounding_box_contains_points_at_radius() {
        let bbox = bounding_box(0.0, 0.0, 50.0);
        let (min_lon, max_lon) = bbox.lon_range.unwrap();
        assert!(max_lon >= 0.449 && min_lon <= -0.449);
        assert!(bbox.max_lat >= 0.449 && bbox.min_lat <= -0.449);
    }

    #[test]
    fn bounding_box_drops_longitude_window_near_poles_and_date_line() {
        assert!(bounding_box(89.9, 10.0, 50.0).lon_range.is_none());
        assert!(bounding_box(10.0, 179.9, 50.0).lon_range.is_none());
        assert!(bounding_box(10.0, 0.0, 50.0).lon_range.is_some());
    }

    #[test]
    fn half_coordinates_do_not_count() {
        assert_eq!(coordinate(Some(1.0), None), None);
        assert_eq!(coordinate(None, Some(1.0)), None);
        assert_eq!(coordinate(Some(1.0), Some(2.0)), Some((1.0, 2.0)));
    }

    #[test]
    fn validates_coordinate_ranges() {
        assert!(is_valid_coordinate(90.0, -180.0));
        assert!(!is_valid_coordinate(90.1, 0.0));
        assert!(!is_valid_coordinate(0.0, f64::NAN));
    }
}
