//! Great-circle distance between geocoded points

use shared::models::Coordinates;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres, rounded to metres
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let km = 2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin();
    (km * 1000.0).round() / 1000.0
}
