//! Restaurants and their menus

use shared::models::{Coordinates, Restaurant, RestaurantMenuItem};
use sqlx::PgPool;

const RESTAURANT_COLUMNS: &str = "id, name, address, contact_phone, longitude, latitude";
const MENU_COLUMNS: &str = "id, restaurant_id, product_id, availability";

/// Column values of a restaurant row, without the id
#[derive(Debug, Clone)]
pub struct RestaurantFields {
    pub name: String,
    pub address: String,
    pub contact_phone: String,
    pub point: Option<Coordinates>,
}

pub async fn list_restaurants(pool: &PgPool) -> Result<Vec<Restaurant>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {RESTAURANT_COLUMNS} FROM restaurants ORDER BY name, id"
    ))
    .fetch_all(pool)
    .await
}

pub async fn get_restaurant(pool: &PgPool, id: i64) -> Result<Option<Restaurant>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create_restaurant(
    pool: &PgPool,
    data: &RestaurantFields,
) -> Result<Restaurant, sqlx::Error> {
    let (longitude, latitude) = Coordinates::into_columns(data.point);
    sqlx::query_as(&format!(
        r#"
        INSERT INTO restaurants (name, address, contact_phone, longitude, latitude)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {RESTAURANT_COLUMNS}
        "#
    ))
    .bind(&data.name)
    .bind(&data.address)
    .bind(&data.contact_phone)
    .bind(longitude)
    .bind(latitude)
    .fetch_one(pool)
    .await
}

/// Overwrite every column of an existing restaurant
pub async fn update_restaurant(
    pool: &PgPool,
    id: i64,
    data: &RestaurantFields,
) -> Result<Option<Restaurant>, sqlx::Error> {
    let (longitude, latitude) = Coordinates::into_columns(data.point);
    sqlx::query_as(&format!(
        r#"
        UPDATE restaurants SET
            name = $1, address = $2, contact_phone = $3, longitude = $4, latitude = $5
        WHERE id = $6
        RETURNING {RESTAURANT_COLUMNS}
        "#
    ))
    .bind(&data.name)
    .bind(&data.address)
    .bind(&data.contact_phone)
    .bind(longitude)
    .bind(latitude)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Menu items cascade; orders assigned to it fall back to unassigned.
pub async fn delete_restaurant(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM restaurants WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

// ── Menu ──

pub async fn list_menu(
    pool: &PgPool,
    restaurant_id: i64,
) -> Result<Vec<RestaurantMenuItem>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {MENU_COLUMNS} FROM restaurant_menu_items WHERE restaurant_id = $1 ORDER BY product_id"
    ))
    .bind(restaurant_id)
    .fetch_all(pool)
    .await
}

/// Every menu item of every restaurant, in one query
pub async fn list_all_menu_items(pool: &PgPool) -> Result<Vec<RestaurantMenuItem>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {MENU_COLUMNS} FROM restaurant_menu_items ORDER BY restaurant_id, product_id"
    ))
    .fetch_all(pool)
    .await
}

/// Insert or flip availability of a (restaurant, product) pair
pub async fn upsert_menu_item(
    pool: &PgPool,
    restaurant_id: i64,
    product_id: i64,
    availability: bool,
) -> Result<RestaurantMenuItem, sqlx::Error> {
    sqlx::query_as(&format!(
        r#"
        INSERT INTO restaurant_menu_items (restaurant_id, product_id, availability)
        VALUES ($1, $2, $3)
        ON CONFLICT (restaurant_id, product_id)
        DO UPDATE SET availability = EXCLUDED.availability
        RETURNING {MENU_COLUMNS}
        "#
    ))
    .bind(restaurant_id)
    .bind(product_id)
    .bind(availability)
    .fetch_one(pool)
    .await
}

pub async fn delete_menu_item(
    pool: &PgPool,
    restaurant_id: i64,
    product_id: i64,
) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query(
        "DELETE FROM restaurant_menu_items WHERE restaurant_id = $1 AND product_id = $2",
    )
    .bind(restaurant_id)
    .bind(product_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
