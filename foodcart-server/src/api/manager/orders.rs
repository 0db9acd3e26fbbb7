//! Order pairing view

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderItem, OrderItemUpdate, OrderStatus, OrderUpdate};
use validator::Validate;

use crate::api::{internal, parse_json};
use crate::db::{orders, restaurants};
use crate::matching::{OrderOverview, annotate_orders};
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, AppError>;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/{id}", get(get_order).patch(update_order))
        .route(
            "/orders/{id}/items/{product_id}",
            patch(update_order_item),
        )
}

#[derive(Debug, Deserialize)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
}

/// Items, totals and covering restaurants for a batch of orders
async fn overview(state: &AppState, orders: Vec<Order>) -> Result<Vec<OrderOverview>, AppError> {
    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let items = orders::list_items(&state.pool, &ids)
        .await
        .map_err(internal)?;
    let restaurants = restaurants::list_restaurants(&state.pool)
        .await
        .map_err(internal)?;
    let menu = restaurants::list_all_menu_items(&state.pool)
        .await
        .map_err(internal)?;
    Ok(annotate_orders(orders, items, &restaurants, &menu))
}

async fn single_overview(state: &AppState, order: Order) -> ApiResult<OrderOverview> {
    let id = order.id;
    overview(state, vec![order])
        .await?
        .pop()
        .map(Json)
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("id", id))
}

pub async fn list_orders(
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> ApiResult<Vec<OrderOverview>> {
    let orders = orders::list_orders(&state.pool, filter.status)
        .await
        .map_err(internal)?;
    Ok(Json(overview(&state, orders).await?))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<OrderOverview> {
    let order = orders::get_order(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("id", id))?;
    single_overview(&state, order).await
}

pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<OrderUpdate>, JsonRejection>,
) -> ApiResult<OrderOverview> {
    let data = parse_json(payload)?;
    data.validate()?;

    let order = orders::update_order(&state.pool, id, &data, shared::util::now_millis()).await?;
    single_overview(&state, order).await
}

pub async fn update_order_item(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(i64, i64)>,
    payload: Result<Json<OrderItemUpdate>, JsonRejection>,
) -> ApiResult<OrderItem> {
    let data = parse_json(payload)?;
    data.validate()?;

    let item = orders::update_item_quantity(&state.pool, id, product_id, data.quantity).await?;
    tracing::info!(order_id = id, product_id, quantity = item.quantity, "Order item quantity changed");
    Ok(Json(item))
}

