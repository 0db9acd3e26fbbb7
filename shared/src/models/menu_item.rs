//! Restaurant Menu Item Model

use serde::{Deserialize, Serialize};

/// (restaurant, product) association: "restaurant sells product",
/// with `availability` telling whether it is currently in stock.
///
/// The pair is unique; rows cascade with either side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RestaurantMenuItem {
    pub id: i64,
    pub restaurant_id: i64,
    pub product_id: i64,
    pub availability: bool,
}

/// Upsert menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemUpsert {
    #[serde(default = "default_true")]
    pub availability: bool,
}

fn default_true() -> bool {
    true
}
