use crate::error::{ProcessingError, Result};

/// Map a longitude onto the 0..360 convention used by AVISO grids.
///
/// # Examples
/// ```
/// use bottle_prep::utils::coordinates::longitude_to_360;
///
/// assert_eq!(longitude_to_360(-30.0), 330.0);
/// assert_eq!(longitude_to_360(10.0), 10.0);
/// ```
pub fn longitude_to_360(longitude: f64) -> f64 {
    longitude.rem_euclid(360.0)
}

/// Map a longitude onto the -180..180 convention.
pub fn longitude_to_180(longitude: f64) -> f64 {
    let wrapped = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid maps +180 to -180; keep the eastern edge as given
    if wrapped == -180.0 && longitude > 0.0 {
        180.0
    } else {
        wrapped
    }
}

/// Validate geographic coordinate ranges
pub fn validate_coordinates(longitude: f64, latitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ProcessingError::InvalidFormat(format!(
            "Latitude {} is outside [-90, 90]",
            latitude
        )));
    }

    if !(-180.0..=360.0).contains(&longitude) {
        return Err(ProcessingError::InvalidFormat(format!(
            "Longitude {} is outside [-180, 360]",
            longitude
        )));
    }

    Ok(())
}

/// Calculate the distance between two points using the Haversine formula
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longitude_to_360() {
        assert_eq!(longitude_to_360(-30.0), 330.0);
        assert_eq!(longitude_to_360(-180.0), 180.0);
        assert_eq!(longitude_to_360(0.0), 0.0);
        assert_eq!(longitude_to_360(359.5), 359.5);
        assert_eq!(longitude_to_360(360.0), 0.0);
    }

    #[test]
    fn test_longitude_to_180() {
        assert_eq!(longitude_to_180(330.0), -30.0);
        assert_eq!(longitude_to_180(-70.25), -70.25);
        assert_eq!(longitude_to_180(180.0), 180.0);
        assert_eq!(longitude_to_180(-180.0), -180.0);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(validate_coordinates(-70.6, 41.5).is_ok());
        assert!(validate_coordinates(289.4, 41.5).is_ok());
        assert!(validate_coordinates(-70.6, 91.0).is_err());
        assert!(validate_coordinates(-200.0, 0.0).is_err());
    }

    #[test]
    fn test_haversine_distance() {
        // Woods Hole to Bermuda
        let distance = haversine_distance(41.52, -70.67, 32.30, -64.78);
        assert!((distance - 1150.0).abs() < 10.0);
    }
}
