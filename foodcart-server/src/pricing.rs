//! Order pricing
//!
//! Line items carry a price snapshot: the product price read once, when the
//! line item is created. Totals are always computed from the snapshots, never
//! from current product prices.

use rust_decimal::Decimal;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{OrderItem, OrderLineInput};
use std::collections::HashMap;

/// A line item about to be inserted, price already snapshotted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub quantity: i32,
    pub price: Decimal,
}

/// Σ quantity × snapshot price
pub fn order_total(items: &[OrderItem]) -> Decimal {
    items.iter().map(OrderItem::line_total).sum()
}

/// Largest quantity a single line item may carry
pub const MAX_LINE_QUANTITY: i32 = 1000;

/// Collapse repeated product ids into one line, summing quantities.
///
/// (order, product) is unique, so a payload listing the same product twice
/// becomes a single line item. First-seen order is kept. A merged quantity
/// above [`MAX_LINE_QUANTITY`] fails the whole batch.
pub fn merge_lines(lines: &[OrderLineInput]) -> AppResult<Vec<(i64, i32)>> {
    let mut merged: Vec<(i64, i32)> = Vec::with_capacity(lines.len());
    let mut index: HashMap<i64, usize> = HashMap::with_capacity(lines.len());
    for line in lines {
        match index.get(&line.product) {
            Some(&i) => merged[i].1 = merged[i].1.saturating_add(line.quantity),
            None => {
                index.insert(line.product, merged.len());
                merged.push((line.product, line.quantity));
            }
        }
    }
    if let Some(&(product, quantity)) = merged
        .iter()
        .find(|(_, q)| !(1..=MAX_LINE_QUANTITY).contains(q))
    {
        return Err(AppError::invalid_field(
            "products",
            format!("quantity for product {product} must be between 1 and {MAX_LINE_QUANTITY}"),
        )
        .with_detail("product", product)
        .with_detail("quantity", quantity));
    }
    Ok(merged)
}

/// Price-snapshot step: copy each product's current price onto its new line.
///
/// Runs exactly once per line item creation. `prices` holds the current
/// price of every product that exists; an unknown product id fails the
/// whole batch.
pub fn snapshot_line_items(
    lines: &[(i64, i32)],
    prices: &HashMap<i64, Decimal>,
) -> AppResult<Vec<NewOrderItem>> {
    lines
        .iter()
        .map(|&(product_id, quantity)| {
            let price = prices.get(&product_id).copied().ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::ProductNotFound,
                    format!("Product {product_id} does not exist"),
                )
                .with_detail("field", "products")
                .with_detail("product", product_id)
            })?;
            Ok(NewOrderItem {
                product_id,
                quantity,
                price,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: i64, quantity: i32, price: Decimal) -> OrderItem {
        OrderItem {
            id: product_id,
            order_id: 1,
            product_id,
            quantity,
            price,
        }
    }

    fn line(product: i64, quantity: i32) -> OrderLineInput {
        OrderLineInput { product, quantity }
    }

    #[test]
    fn total_sums_quantity_times_price() {
        let items = vec![
            item(1, 2, Decimal::new(1000, 2)),
            item(2, 1, Decimal::new(500, 2)),
        ];
        assert_eq!(order_total(&items), Decimal::new(2500, 2));
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn duplicate_products_are_merged() {
        let merged = merge_lines(&[line(3, 1), line(1, 2), line(3, 4)]).unwrap();
        assert_eq!(merged, vec![(3, 5), (1, 2)]);
    }

    #[test]
    fn merged_quantity_is_capped() {
        let merged = merge_lines(&[line(1, 600), line(1, 400)]).unwrap();
        assert_eq!(merged, vec![(1, MAX_LINE_QUANTITY)]);

        let err = merge_lines(&[line(2, 1), line(1, 1000), line(1, 1000)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "products");
        assert_eq!(details.get("product").unwrap(), 1);
        assert_eq!(details.get("quantity").unwrap(), 2000);
    }

    #[test]
    fn snapshot_copies_current_price() {
        let prices = HashMap::from([(1, Decimal::new(1000, 2)), (2, Decimal::new(500, 2))]);
        let items = snapshot_line_items(&[(1, 2), (2, 1)], &prices).unwrap();
        assert_eq!(
            items,
            vec![
                NewOrderItem {
                    product_id: 1,
                    quantity: 2,
                    price: Decimal::new(1000, 2)
                },
                NewOrderItem {
                    product_id: 2,
                    quantity: 1,
                    price: Decimal::new(500, 2)
                },
            ]
        );
    }

    #[test]
    fn snapshot_is_frozen_after_creation() {
        let mut prices = HashMap::from([(1, Decimal::new(1000, 2))]);
        let snapshot = snapshot_line_items(&[(1, 3)], &prices).unwrap();
        let created: Vec<OrderItem> = snapshot
            .iter()
            .map(|n| item(n.product_id, n.quantity, n.price))
            .collect();

        prices.insert(1, Decimal::new(9999, 2));

        assert_eq!(created[0].price, Decimal::new(1000, 2));
        assert_eq!(order_total(&created), Decimal::new(3000, 2));
    }

    #[test]
    fn unknown_product_fails_batch() {
        let prices = HashMap::from([(1, Decimal::ONE)]);
        let err = snapshot_line_items(&[(1, 1), (42, 1)], &prices).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);
        let details = err.details.unwrap();
        assert_eq!(details.get("product").unwrap(), 42);
        assert_eq!(details.get("field").unwrap(), "products");
    }
}
