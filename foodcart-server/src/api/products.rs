//! Storefront product list

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::error::AppError;

use crate::db::catalog::{self, AvailableProductRow};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/products/", get(list_products))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedRef {
    pub id: i64,
    pub name: String,
}

/// Product as shown on the storefront
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub special_status: bool,
    pub description: String,
    pub category: Option<NamedRef>,
    pub image: String,
    /// Mirrors the product's own id and name; storefront clients read it
    /// this way.
    pub restaurant: NamedRef,
}

/// Public URL of a stored media path; empty paths stay empty
pub fn media_src(media_url: &str, path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    format!("{media_url}{}", path.trim_start_matches('/'))
}

impl ProductView {
    pub fn from_row(row: AvailableProductRow, media_url: &str) -> Self {
        let category = match (row.category_id, row.category_name) {
            (Some(id), Some(name)) => Some(NamedRef { id, name }),
            _ => None,
        };
        Self {
            image: media_src(media_url, &row.image),
            restaurant: NamedRef {
                id: row.id,
                name: row.name.clone(),
            },
            id: row.id,
            name: row.name,
            price: row.price,
            special_status: row.special_status,
            description: row.description,
            category,
        }
    }
}

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductView>>, AppError> {
    let rows = catalog::list_available_products(&state.pool)
        .await
        .map_err(super::internal)?;
    Ok(Json(
        rows.into_iter()
            .map(|row| ProductView::from_row(row, &state.media_url))
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(category: Option<(i64, &str)>, image: &str) -> AvailableProductRow {
        AvailableProductRow {
            id: 7,
            name: "Чизбургер".into(),
            price: Decimal::new(18900, 2),
            special_status: true,
            description: "С сыром".into(),
            image: image.into(),
            category_id: category.map(|c| c.0),
            category_name: category.map(|c| c.1.to_string()),
        }
    }

    #[test]
    fn view_carries_category_and_media_url() {
        let view = ProductView::from_row(row(Some((2, "Бургеры")), "cheese.png"), "/media/");
        assert_eq!(view.image, "/media/cheese.png");
        assert_eq!(
            view.category,
            Some(NamedRef {
                id: 2,
                name: "Бургеры".into()
            })
        );
    }

    #[test]
    fn restaurant_field_mirrors_the_product() {
        let view = ProductView::from_row(row(None, ""), "/media/");
        assert_eq!(view.restaurant.id, 7);
        assert_eq!(view.restaurant.name, "Чизбургер");
        assert_eq!(view.category, None);
        assert_eq!(view.image, "");
    }

    #[test]
    fn view_serializes_price_as_decimal_string() {
        let json = serde_json::to_value(ProductView::from_row(row(None, "/a.png"), "/media/")).unwrap();
        assert_eq!(json["price"], "189.00");
        assert_eq!(json["image"], "/media/a.png");
        assert!(json["category"].is_null());
    }
}
