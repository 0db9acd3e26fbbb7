//! Product management

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use http::StatusCode;
use shared::error::AppError;
use shared::models::{Product, ProductCreate, ProductUpdate};

use crate::api::{internal, parse_json};
use crate::db::catalog;
use crate::error::ServiceError;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, AppError>;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
}

fn product_not_found(id: i64) -> AppError {
    AppError::not_found("Product").with_detail("id", id)
}

pub async fn list_products(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    let products = catalog::list_products(&state.pool)
        .await
        .map_err(internal)?;
    Ok(Json(products))
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let data = parse_json(payload)?;
    data.check()?;

    let product = catalog::create_product(&state.pool, &data)
        .await
        .map_err(ServiceError::from)?;
    tracing::info!(product_id = product.id, price = %product.price, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Price changes apply to future orders only.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<ProductUpdate>, JsonRejection>,
) -> ApiResult<Product> {
    let data = parse_json(payload)?;
    data.check()?;

    catalog::update_product(&state.pool, id, &data)
        .await
        .map_err(ServiceError::from)?
        .map(Json)
        .ok_or_else(|| product_not_found(id))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    // Products referenced by order items are protected by a foreign key
    if !catalog::delete_product(&state.pool, id)
        .await
        .map_err(ServiceError::from)?
    {
        return Err(product_not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
