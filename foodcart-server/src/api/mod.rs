//! HTTP routes
//!
//! - `/api/banners/`, `/api/products/`, `/api/order/`: storefront
//! - `/api/manager/*`: back-office JSON API
//! - `/health`

pub mod banners;
pub mod health;
pub mod manager;
pub mod order;
pub mod products;

use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use http::HeaderName;
use shared::error::{AppError, ErrorCode};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the application with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(banners::router())
        .merge(products::router())
        .merge(order::router())
        .nest("/api/manager", manager::router())
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        // Last layer runs first: the id must exist before propagation and tracing see the request.
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            MakeRequestUuid,
        ))
        .with_state(state)
}

pub(crate) fn internal(e: impl std::fmt::Display) -> AppError {
    tracing::error!("Query error: {e}");
    AppError::internal("Internal server error")
}

/// Unwrap a JSON body, turning axum's rejection into an `InvalidFormat` error
pub(crate) fn parse_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            Err(AppError::with_message(ErrorCode::InvalidFormat, rejection.body_text()))
        }
    }
}
