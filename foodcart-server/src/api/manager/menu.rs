//! Product × restaurant availability matrix

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use shared::error::AppError;
use shared::models::{Product, Restaurant, RestaurantMenuItem};
use std::collections::{BTreeMap, HashMap};

use crate::api::internal;
use crate::api::products::NamedRef;
use crate::db::{catalog, restaurants};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/menu", get(menu_matrix))
}

/// One product row; every restaurant appears, `false` when it has no menu item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuRow {
    pub product: NamedRef,
    pub availability: BTreeMap<i64, bool>,
}

pub fn availability_matrix(
    products: &[Product],
    restaurants: &[Restaurant],
    items: &[RestaurantMenuItem],
) -> Vec<MenuRow> {
    let lookup: HashMap<(i64, i64), bool> = items
        .iter()
        .map(|i| ((i.product_id, i.restaurant_id), i.availability))
        .collect();

    products
        .iter()
        .map(|p| MenuRow {
            product: NamedRef {
                id: p.id,
                name: p.name.clone(),
            },
            availability: restaurants
                .iter()
                .map(|r| {
                    let available = lookup.get(&(p.id, r.id)).copied().unwrap_or(false);
                    (r.id, available)
                })
                .collect(),
        })
        .collect()
}

pub async fn menu_matrix(State(state): State<AppState>) -> Result<Json<Vec<MenuRow>>, AppError> {
    let products = catalog::list_products(&state.pool)
        .await
        .map_err(internal)?;
    let restaurants = restaurants::list_restaurants(&state.pool)
        .await
        .map_err(internal)?;
    let items = restaurants::list_all_menu_items(&state.pool)
        .await
        .map_err(internal)?;
    Ok(Json(availability_matrix(&products, &restaurants, &items)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(id: i64, name: &str) -> Product {
        Product {
            id,
            name: name.into(),
            category_id: None,
            price: Decimal::new(10000, 2),
            image: String::new(),
            special_status: false,
            description: String::new(),
        }
    }

    fn restaurant(id: i64) -> Restaurant {
        Restaurant {
            id,
            name: format!("R{id}"),
            address: String::new(),
            contact_phone: String::new(),
            longitude: None,
            latitude: None,
        }
    }

    #[test]
    fn matrix_fills_missing_pairs_with_false() {
        let items = vec![
            RestaurantMenuItem {
                id: 1,
                restaurant_id: 1,
                product_id: 10,
                availability: true,
            },
            RestaurantMenuItem {
                id: 2,
                restaurant_id: 2,
                product_id: 10,
                availability: false,
            },
        ];
        let matrix = availability_matrix(
            &[product(10, "Cola"), product(11, "Fries")],
            &[restaurant(1), restaurant(2)],
            &items,
        );

        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix[0].availability, BTreeMap::from([(1, true), (2, false)]));
        assert_eq!(matrix[1].availability, BTreeMap::from([(1, false), (2, false)]));

        let json = serde_json::to_value(&matrix[0]).unwrap();
        assert_eq!(json["product"]["name"], "Cola");
        assert_eq!(json["availability"]["1"], true);
    }
}
