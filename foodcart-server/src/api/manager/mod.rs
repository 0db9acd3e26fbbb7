//! Manager API: order pairing, restaurants, menus and the catalog
//!
//! JSON counterpart of the back-office screens. Deletes answer
//! `204 No Content`.

pub mod categories;
pub mod menu;
pub mod orders;
pub mod products;
pub mod restaurants;

use axum::Router;

use crate::state::AppState;

/// Routes mounted under `/api/manager`
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(orders::router())
        .merge(restaurants::router())
        .merge(menu::router())
        .merge(products::router())
        .merge(categories::router())
}
