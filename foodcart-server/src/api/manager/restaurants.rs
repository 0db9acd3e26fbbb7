//! Restaurants and per-restaurant menus

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use http::StatusCode;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Coordinates, MenuItemUpsert, Restaurant, RestaurantCreate, RestaurantMenuItem,
    RestaurantUpdate,
};
use validator::Validate;

use crate::api::{internal, parse_json};
use crate::db::catalog;
use crate::db::restaurants::{self, RestaurantFields};
use crate::error::ServiceError;
use crate::geocoder::GeoResolver;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, AppError>;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants).post(create_restaurant))
        .route(
            "/restaurants/{id}",
            put(update_restaurant).delete(delete_restaurant),
        )
        .route("/restaurants/{id}/menu", get(list_menu))
        .route(
            "/restaurants/{id}/menu/{product_id}",
            put(upsert_menu_item).delete(delete_menu_item),
        )
}

fn restaurant_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::RestaurantNotFound).with_detail("id", id)
}

async fn require_restaurant(state: &AppState, id: i64) -> Result<Restaurant, AppError> {
    restaurants::get_restaurant(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| restaurant_not_found(id))
}

pub async fn list_restaurants(State(state): State<AppState>) -> ApiResult<Vec<Restaurant>> {
    let list = restaurants::list_restaurants(&state.pool)
        .await
        .map_err(internal)?;
    Ok(Json(list))
}

pub async fn create_restaurant(
    State(state): State<AppState>,
    payload: Result<Json<RestaurantCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Restaurant>), AppError> {
    let data = parse_json(payload)?;
    data.validate()?;

    let fields = RestaurantFields {
        point: state.geo.locate(&data.address).await,
        name: data.name,
        address: data.address,
        contact_phone: data.contact_phone,
    };
    let created = restaurants::create_restaurant(&state.pool, &fields)
        .await
        .map_err(ServiceError::from)?;
    tracing::info!(restaurant_id = created.id, located = fields.point.is_some(), "Restaurant created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Absent fields keep their value; see [`relocate`] for coordinates.
pub async fn update_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<RestaurantUpdate>, JsonRejection>,
) -> ApiResult<Restaurant> {
    let data = parse_json(payload)?;
    data.validate()?;

    let current = require_restaurant(&state, id).await?;
    let address = data.address.unwrap_or_else(|| current.address.clone());
    let point = relocate(&state.geo, &current, &address).await;

    let fields = RestaurantFields {
        name: data.name.unwrap_or(current.name),
        contact_phone: data.contact_phone.unwrap_or(current.contact_phone),
        address,
        point,
    };
    restaurants::update_restaurant(&state.pool, id, &fields)
        .await
        .map_err(ServiceError::from)?
        .map(Json)
        .ok_or_else(|| restaurant_not_found(id))
}

/// Keep stored coordinates for an unchanged address; look up a changed
/// address, or one that never resolved.
async fn relocate(geo: &GeoResolver, current: &Restaurant, address: &str) -> Option<Coordinates> {
    match current.coordinates() {
        Some(point) if address == current.address => Some(point),
        _ => geo.locate(address).await,
    }
}

pub async fn delete_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !restaurants::delete_restaurant(&state.pool, id)
        .await
        .map_err(internal)?
    {
        return Err(restaurant_not_found(id));
    }
    tracing::info!(restaurant_id = id, "Restaurant deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_menu(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<RestaurantMenuItem>> {
    require_restaurant(&state, id).await?;
    let items = restaurants::list_menu(&state.pool, id)
        .await
        .map_err(internal)?;
    Ok(Json(items))
}

pub async fn upsert_menu_item(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(i64, i64)>,
    payload: Result<Json<MenuItemUpsert>, JsonRejection>,
) -> ApiResult<RestaurantMenuItem> {
    let data = parse_json(payload)?;

    require_restaurant(&state, id).await?;
    if catalog::get_product(&state.pool, product_id)
        .await
        .map_err(internal)?
        .is_none()
    {
        return Err(AppError::not_found("Product").with_detail("id", product_id));
    }

    let item = restaurants::upsert_menu_item(&state.pool, id, product_id, data.availability)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(item))
}

pub async fn delete_menu_item(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    if !restaurants::delete_menu_item(&state.pool, id, product_id)
        .await
        .map_err(internal)?
    {
        return Err(AppError::new(ErrorCode::MenuItemNotFound)
            .with_detail("restaurant_id", id)
            .with_detail("product_id", product_id));
    }
    Ok(StatusCode::NO_CONTENT)
}
