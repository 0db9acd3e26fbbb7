//! Data models
//!
//! Shared between the storefront server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (PostgreSQL BIGSERIAL), timestamps are Unix millis.

pub mod banner;
pub mod category;
pub mod coordinates;
pub mod menu_item;
pub mod order;
pub mod product;
pub mod restaurant;

// Re-exports
pub use banner::*;
pub use category::*;
pub use coordinates::*;
pub use menu_item::*;
pub use order::*;
pub use product::*;
pub use restaurant::*;
