//! Calendar and great-circle helpers.

/// Mean earth radius used for epicentral distances, in km.
pub const EARTH_RADIUS_KM: f64 = 6371.227;

/// Days elapsed before the first of each month in a non-leap year.
const MONTH_OFFSETS: [f64; 12] = [
    0.0, 31.0, 59.0, 90.0, 120.0, 151.0, 181.0, 212.0, 243.0, 273.0, 304.0, 334.0,
];

/// Decimal year for a calendar date.
///
/// Every year is treated as 365 days long, so 1 January maps to the integer
/// year. Months outside `1..=12` are clamped into range.
pub fn decimal_year(year: i32, month: u32, day: u32) -> f64 {
    let m = (month.clamp(1, 12) - 1) as usize;
    year as f64 + (MONTH_OFFSETS[m] + day as f64 - 1.0) / 365.0
}

/// Haversine great-circle distance in km between two (lon, lat) points in degrees.
pub fn haversine_km(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (lon1, lat1, lon2, lat2) = (
        lon1.to_radians(),
        lat1.to_radians(),
        lon2.to_radians(),
        lat2.to_radians(),
    );
    let dlat = lat1 - lat2;
    let dlon = lon1 - lon2;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}
