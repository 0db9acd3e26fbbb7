//! Product categories

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{delete, get};
use axum::{Json, Router};
use http::StatusCode;
use shared::error::{AppError, ErrorCode};
use shared::models::{CategoryCreate, ProductCategory};
use validator::Validate;

use crate::api::{internal, parse_json};
use crate::db::catalog;
use crate::error::ServiceError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/{id}", delete(delete_category))
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductCategory>>, AppError> {
    let categories = catalog::list_categories(&state.pool)
        .await
        .map_err(internal)?;
    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    payload: Result<Json<CategoryCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductCategory>), AppError> {
    let data = parse_json(payload)?;
    data.validate()?;

    let category = catalog::create_category(&state.pool, &data)
        .await
        .map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !catalog::delete_category(&state.pool, id)
        .await
        .map_err(internal)?
    {
        return Err(AppError::new(ErrorCode::CategoryNotFound).with_detail("id", id));
    }
    Ok(StatusCode::NO_CONTENT)
}
