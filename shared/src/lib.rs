//! Shared types for the storefront backend
//!
//! Error types, API response structures and the catalog/order data models
//! used by the server and its tests.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
