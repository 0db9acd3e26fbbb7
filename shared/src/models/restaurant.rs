//! Restaurant Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Coordinates;

/// Restaurant entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub contact_phone: String,
    /// Resolved from `address` by the geocoder, absent when lookup failed
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

impl Restaurant {
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_columns(self.longitude, self.latitude)
    }
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RestaurantCreate {
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub address: String,
    #[serde(default)]
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub contact_phone: String,
}

/// Update restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RestaurantUpdate {
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub address: Option<String>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub contact_phone: Option<String>,
}
