//! Geographic coordinates

use serde::{Deserialize, Serialize};

/// A point as returned by the geocoder: longitude first, latitude second
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Build from nullable DB columns; both must be present
    pub fn from_columns(longitude: Option<f64>, latitude: Option<f64>) -> Option<Self> {
        match (longitude, latitude) {
            (Some(longitude), Some(latitude)) => Some(Self::new(longitude, latitude)),
            _ => None,
        }
    }

    /// Split into nullable DB columns
    pub fn into_columns(point: Option<Self>) -> (Option<f64>, Option<f64>) {
        match point {
            Some(p) => (Some(p.longitude), Some(p.latitude)),
            None => (None, None),
        }
    }
}
