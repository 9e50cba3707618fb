//! Coordinate validation for check-in and check-out stamps.

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Validate a latitude/longitude pair in decimal degrees.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), String> {
    if !latitude.is_finite() || !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
        return Err(format!(
            "latitude must be between {MIN_LATITUDE} and {MAX_LATITUDE}, got {latitude}"
        ));
    }
    if !longitude.is_finite() || !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
        return Err(format!(
            "longitude must be between {MIN_LONGITUDE} and {MAX_LONGITUDE}, got {longitude}"
        ));
    }
    Ok(())
}
