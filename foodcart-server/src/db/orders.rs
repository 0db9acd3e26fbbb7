//! Orders and their line items

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{Coordinates, Order, OrderItem, OrderStatus, OrderUpdate, PaymentMethod};
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::{HashMap, HashSet};

use crate::error::{ServiceError, ServiceResult};
use crate::matching::{MenuIndex, restaurants_covering};
use crate::pricing::snapshot_line_items;

const ORDER_COLUMNS: &str = "id, firstname, lastname, phonenumber, address, longitude, latitude, \
     status, payment, registered_at, called_at, delivered_at, comment, restaurant_id";
const ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, price";

/// Validated storefront order, ready to be stored
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub firstname: String,
    pub lastname: String,
    /// E.164
    pub phonenumber: String,
    pub address: String,
    pub point: Option<Coordinates>,
    pub payment: PaymentMethod,
    pub comment: String,
    pub registered_at: i64,
}

/// Create an order with one line item per `(product_id, quantity)`.
///
/// Runs in a single transaction: the referenced products are read under a
/// share lock, their current prices are snapshotted onto the line items, and
/// any failure leaves neither the order nor its items behind.
pub async fn insert_order(
    pool: &PgPool,
    order: &NewOrder,
    lines: &[(i64, i32)],
) -> ServiceResult<(Order, Vec<OrderItem>)> {
    let mut tx = pool.begin().await?;

    let product_ids: Vec<i64> = lines.iter().map(|(id, _)| *id).collect();
    let rows: Vec<(i64, Decimal)> =
        sqlx::query_as("SELECT id, price FROM products WHERE id = ANY($1) FOR SHARE")
            .bind(&product_ids)
            .fetch_all(&mut *tx)
            .await?;
    let prices: HashMap<i64, Decimal> = rows.into_iter().collect();

    let new_items = snapshot_line_items(lines, &prices)?;

    let (longitude, latitude) = Coordinates::into_columns(order.point);
    let created: Order = sqlx::query_as(&format!(
        r#"
        INSERT INTO orders (
            firstname, lastname, phonenumber, address, longitude, latitude,
            status, payment, registered_at, comment
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {ORDER_COLUMNS}
        "#
    ))
    .bind(&order.firstname)
    .bind(&order.lastname)
    .bind(&order.phonenumber)
    .bind(&order.address)
    .bind(longitude)
    .bind(latitude)
    .bind(OrderStatus::New.as_db())
    .bind(order.payment.as_db())
    .bind(order.registered_at)
    .bind(&order.comment)
    .fetch_one(&mut *tx)
    .await?;

    let ids: Vec<i64> = new_items.iter().map(|i| i.product_id).collect();
    let quantities: Vec<i32> = new_items.iter().map(|i| i.quantity).collect();
    let snapshot: Vec<Decimal> = new_items.iter().map(|i| i.price).collect();
    let mut items: Vec<OrderItem> = sqlx::query_as(&format!(
        r#"
        INSERT INTO order_items (order_id, product_id, quantity, price)
        SELECT $1::bigint, u.product_id, u.quantity, u.price
        FROM UNNEST($2::bigint[], $3::integer[], $4::numeric[]) AS u(product_id, quantity, price)
        RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(created.id)
    .bind(&ids)
    .bind(&quantities)
    .bind(&snapshot)
    .fetch_all(&mut *tx)
    .await?;
    items.sort_by_key(|i| i.id);

    tx.commit().await?;

    tracing::info!(
        order_id = created.id,
        items = items.len(),
        "Order registered"
    );
    Ok((created, items))
}

/// Unfinished orders by default; an explicit status filter may include completed ones.
pub async fn list_orders(
    pool: &PgPool,
    status: Option<OrderStatus>,
) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as(&format!(
        r#"
        SELECT {ORDER_COLUMNS} FROM orders
        WHERE ($1::text IS NULL AND status <> 'completed') OR status = $1
        ORDER BY registered_at DESC, id DESC
        "#
    ))
    .bind(status.map(|s| s.as_db()))
    .fetch_all(pool)
    .await
}

pub async fn get_order(pool: &PgPool, id: i64) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Line items of several orders in one query
pub async fn list_items(pool: &PgPool, order_ids: &[i64]) -> Result<Vec<OrderItem>, sqlx::Error> {
    if order_ids.is_empty() {
        return Ok(vec![]);
    }
    sqlx::query_as(&format!(
        "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ANY($1) ORDER BY order_id, id"
    ))
    .bind(order_ids)
    .fetch_all(pool)
    .await
}

/// `called_at` / `delivered_at` after a status change.
///
/// Explicit values win; otherwise entering `in_progress` stamps `called_at`
/// and entering `completed` stamps `delivered_at`, unless already set.
pub fn stamp_timestamps(
    current: &Order,
    next: OrderStatus,
    data: &OrderUpdate,
    now: i64,
) -> (Option<i64>, Option<i64>) {
    let mut called_at = data.called_at.or(current.called_at);
    let mut delivered_at = data.delivered_at.or(current.delivered_at);
    if next != current.status {
        match next {
            OrderStatus::InProgress => {
                called_at.get_or_insert(now);
            }
            OrderStatus::Completed => {
                delivered_at.get_or_insert(now);
            }
            OrderStatus::New => {}
        }
    }
    (called_at, delivered_at)
}

fn order_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::OrderNotFound).with_detail("id", id)
}

/// Manager update of an order.
///
/// Status only moves forward. A newly assigned restaurant must cover every
/// product of the order.
pub async fn update_order(
    pool: &PgPool,
    id: i64,
    data: &OrderUpdate,
    now: i64,
) -> ServiceResult<Order> {
    let mut tx = pool.begin().await?;

    let current: Order = sqlx::query_as(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| order_not_found(id))?;

    let status = data.status.unwrap_or(current.status);
    current.status.check_transition(status)?;

    let restaurant_id = match data.restaurant_id {
        Some(rid) if current.restaurant_id != Some(rid) => {
            ensure_covers(&mut tx, id, rid).await?;
            Some(rid)
        }
        _ => current.restaurant_id,
    };

    let (called_at, delivered_at) = stamp_timestamps(&current, status, data, now);
    let payment = data.payment.unwrap_or(current.payment);
    let comment = data.comment.as_deref().unwrap_or(&current.comment);

    let updated: Order = sqlx::query_as(&format!(
        r#"
        UPDATE orders SET
            status = $1, payment = $2, comment = $3, restaurant_id = $4,
            called_at = $5, delivered_at = $6
        WHERE id = $7
        RETURNING {ORDER_COLUMNS}
        "#
    ))
    .bind(status.as_db())
    .bind(payment.as_db())
    .bind(comment)
    .bind(restaurant_id)
    .bind(called_at)
    .bind(delivered_at)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    if status != current.status {
        tracing::info!(
            order_id = id,
            from = current.status.as_db(),
            to = status.as_db(),
            "Order status changed"
        );
    }
    Ok(updated)
}

async fn ensure_covers(
    tx: &mut Transaction<'_, Postgres>,
    order_id: i64,
    restaurant_id: i64,
) -> ServiceResult<()> {
    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM restaurants WHERE id = $1")
        .bind(restaurant_id)
        .fetch_optional(&mut **tx)
        .await?;
    if exists.is_none() {
        return Err(AppError::new(ErrorCode::RestaurantNotFound)
            .with_detail("restaurant_id", restaurant_id)
            .into());
    }

    let ordered: Vec<i64> =
        sqlx::query_scalar("SELECT DISTINCT product_id FROM order_items WHERE order_id = $1")
            .bind(order_id)
            .fetch_all(&mut **tx)
            .await?;
    let available: Vec<i64> = sqlx::query_scalar(
        "SELECT product_id FROM restaurant_menu_items WHERE restaurant_id = $1 AND availability",
    )
    .bind(restaurant_id)
    .fetch_all(&mut **tx)
    .await?;

    let menu = MenuIndex::from([(restaurant_id, available.into_iter().collect())]);
    let products: HashSet<i64> = ordered.into_iter().collect();
    if !restaurants_covering(&products, &menu).contains(&restaurant_id) {
        return Err(AppError::new(ErrorCode::OrderNotCovered)
            .with_detail("restaurant_id", restaurant_id)
            .into());
    }
    Ok(())
}

/// Change a line item's quantity. The snapshot price is never touched.
pub async fn update_item_quantity(
    pool: &PgPool,
    order_id: i64,
    product_id: i64,
    quantity: i32,
) -> ServiceResult<OrderItem> {
    let mut tx = pool.begin().await?;

    let status: Option<String> =
        sqlx::query_scalar("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
            .bind(order_id)
            .fetch_optional(&mut *tx)
            .await?;
    let status = status.ok_or_else(|| order_not_found(order_id))?;
    let status = OrderStatus::try_from(status).map_err(|e| ServiceError::Db(e.into()))?;
    if status == OrderStatus::Completed {
        return Err(AppError::new(ErrorCode::OrderAlreadyCompleted).into());
    }

    let item: OrderItem = sqlx::query_as(&format!(
        r#"
        UPDATE order_items SET quantity = $1
        WHERE order_id = $2 AND product_id = $3
        RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(quantity)
    .bind(order_id)
    .bind(product_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| {
        AppError::new(ErrorCode::OrderItemNotFound)
            .with_detail("order_id", order_id)
            .with_detail("product_id", product_id)
    })?;

    tx.commit().await?;
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(status: OrderStatus) -> Order {
        Order {
            id: 1,
            firstname: "Анна".into(),
            lastname: "Смирнова".into(),
            phonenumber: "+79990000000".into(),
            address: "Москва, Тверская 1".into(),
            longitude: None,
            latitude: None,
            status,
            payment: PaymentMethod::Cash,
            registered_at: 1_000,
            called_at: None,
            delivered_at: None,
            comment: String::new(),
            restaurant_id: None,
        }
    }

    #[test]
    fn entering_in_progress_stamps_called_at() {
        let current = order(OrderStatus::New);
        let stamped = stamp_timestamps(&current, OrderStatus::InProgress, &OrderUpdate::default(), 5_000);
        assert_eq!(stamped, (Some(5_000), None));
    }

    #[test]
    fn completing_keeps_existing_called_at_and_stamps_delivery() {
        let mut current = order(OrderStatus::InProgress);
        current.called_at = Some(2_000);
        let stamped = stamp_timestamps(&current, OrderStatus::Completed, &OrderUpdate::default(), 9_000);
        assert_eq!(stamped, (Some(2_000), Some(9_000)));
    }

    #[test]
    fn explicit_timestamps_win() {
        let current = order(OrderStatus::New);
        let update = OrderUpdate {
            called_at: Some(1_500),
            ..Default::default()
        };
        let stamped = stamp_timestamps(&current, OrderStatus::InProgress, &update, 5_000);
        assert_eq!(stamped, (Some(1_500), None));
    }

    #[test]
    fn unchanged_status_stamps_nothing() {
        let current = order(OrderStatus::InProgress);
        let stamped = stamp_timestamps(&current, OrderStatus::InProgress, &OrderUpdate::default(), 5_000);
        assert_eq!(stamped, (None, None));
    }
}
