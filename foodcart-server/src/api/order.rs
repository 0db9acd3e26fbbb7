//! Storefront order registration

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use http::StatusCode;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::error::AppError;
use shared::models::{Order, OrderItem, RegisterOrderRequest, normalize_phone};

use crate::db::orders::{self, NewOrder};
use crate::pricing::{merge_lines, order_total};
use crate::state::AppState;

use super::parse_json;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/order/", post(register_order))
}

/// Created order with its line items and total
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
}

impl OrderDetail {
    pub fn new(order: Order, items: Vec<OrderItem>) -> Self {
        Self {
            total: order_total(&items),
            order,
            items,
        }
    }
}

/// Validate, geocode the address, then store order and items atomically
pub async fn register_order(
    State(state): State<AppState>,
    payload: Result<Json<RegisterOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderDetail>), AppError> {
    let req = parse_json(payload)?;
    req.check()?;

    let phonenumber = normalize_phone(&req.phonenumber)
        .ok_or_else(|| AppError::invalid_field("phonenumber", "invalid phone number"))?;
    let lines = merge_lines(&req.products)?;

    // Outside the transaction; a failed lookup just leaves coordinates unset
    let point = state.geo.locate(&req.address).await;

    let new_order = NewOrder {
        firstname: req.firstname,
        lastname: req.lastname,
        phonenumber,
        address: req.address,
        point,
        payment: req.payment.unwrap_or_default(),
        comment: req.comment.unwrap_or_default(),
        registered_at: shared::util::now_millis(),
    };

    let (order, items) = orders::insert_order(&state.pool, &new_order, &lines).await?;
    Ok((StatusCode::CREATED, Json(OrderDetail::new(order, items))))
}
