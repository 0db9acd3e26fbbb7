//! Product catalog: categories and products

use rust_decimal::Decimal;
use shared::models::{CategoryCreate, Product, ProductCategory, ProductCreate, ProductUpdate};
use sqlx::PgPool;

const PRODUCT_COLUMNS: &str =
    "id, name, category_id, price, image, special_status, description";

// ── Categories ──

pub async fn list_categories(pool: &PgPool) -> Result<Vec<ProductCategory>, sqlx::Error> {
    sqlx::query_as("SELECT id, name FROM product_categories ORDER BY name, id")
        .fetch_all(pool)
        .await
}

pub async fn create_category(
    pool: &PgPool,
    data: &CategoryCreate,
) -> Result<ProductCategory, sqlx::Error> {
    sqlx::query_as("INSERT INTO product_categories (name) VALUES ($1) RETURNING id, name")
        .bind(&data.name)
        .fetch_one(pool)
        .await
}

/// Products of the category keep existing with a NULL category.
pub async fn delete_category(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM product_categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

// ── Products ──

pub async fn list_products(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name, id"
    ))
    .fetch_all(pool)
    .await
}

pub async fn get_product(pool: &PgPool, id: i64) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create_product(pool: &PgPool, data: &ProductCreate) -> Result<Product, sqlx::Error> {
    sqlx::query_as(&format!(
        r#"
        INSERT INTO products (name, category_id, price, image, special_status, description)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {PRODUCT_COLUMNS}
        "#
    ))
    .bind(&data.name)
    .bind(data.category_id)
    .bind(data.price)
    .bind(&data.image)
    .bind(data.special_status)
    .bind(&data.description)
    .fetch_one(pool)
    .await
}

/// Partial update; absent fields keep their value.
///
/// Existing order line items are untouched: they carry their own price.
pub async fn update_product(
    pool: &PgPool,
    id: i64,
    data: &ProductUpdate,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as(&format!(
        r#"
        UPDATE products SET
            name = COALESCE($1, name),
            category_id = CASE WHEN $8 THEN $2 ELSE category_id END,
            price = COALESCE($3, price),
            image = COALESCE($4, image),
            special_status = COALESCE($5, special_status),
            description = COALESCE($6, description)
        WHERE id = $7
        RETURNING {PRODUCT_COLUMNS}
        "#
    ))
    .bind(&data.name)
    .bind(data.category_id.flatten())
    .bind(data.price)
    .bind(&data.image)
    .bind(data.special_status)
    .bind(&data.description)
    .bind(id)
    .bind(data.category_id.is_some())
    .fetch_optional(pool)
    .await
}

pub async fn delete_product(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

// ── Storefront ──

/// Product joined with its category, as listed on the storefront
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AvailableProductRow {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub special_status: bool,
    pub description: String,
    pub image: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
}

/// Products with at least one available menu item
pub async fn list_available_products(
    pool: &PgPool,
) -> Result<Vec<AvailableProductRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT p.id, p.name, p.price, p.special_status, p.description, p.image,
               c.id AS category_id, c.name AS category_name
        FROM products p
        LEFT JOIN product_categories c ON c.id = p.category_id
        WHERE EXISTS (
            SELECT 1 FROM restaurant_menu_items m
            WHERE m.product_id = p.id AND m.availability
        )
        ORDER BY p.id
        "#,
    )
    .fetch_all(pool)
    .await
}
