//! Order → restaurant matching
//!
//! A restaurant covers an order when every distinct product of the order is
//! on its menu and currently available. All covering restaurants are
//! returned; picking one is left to the manager.

use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{Coordinates, Order, OrderItem, Restaurant, RestaurantMenuItem};
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::geocoder::distance_km;
use crate::pricing::order_total;

/// restaurant_id → ids of products it currently has available
pub type MenuIndex = HashMap<i64, HashSet<i64>>;

/// Index available menu items by restaurant; unavailable rows are ignored
pub fn build_menu_index<'a>(items: impl IntoIterator<Item = &'a RestaurantMenuItem>) -> MenuIndex {
    let mut index = MenuIndex::new();
    for item in items.into_iter().filter(|i| i.availability) {
        index
            .entry(item.restaurant_id)
            .or_default()
            .insert(item.product_id);
    }
    index
}

/// Ids of restaurants whose available products are a superset of `products`.
///
/// An empty product set is covered by nobody.
pub fn restaurants_covering(products: &HashSet<i64>, menu: &MenuIndex) -> BTreeSet<i64> {
    if products.is_empty() {
        return BTreeSet::new();
    }
    menu.iter()
        .filter(|(_, available)| products.is_subset(available))
        .map(|(restaurant_id, _)| *restaurant_id)
        .collect()
}

/// Distinct product ids referenced by an order's line items
pub fn order_products(items: &[OrderItem]) -> HashSet<i64> {
    items.iter().map(|i| i.product_id).collect()
}

/// Covering restaurant annotated with its distance to the delivery address
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoveringRestaurant {
    pub id: i64,
    pub name: String,
    /// `None` when either side has no coordinates
    pub distance_km: Option<f64>,
}

/// Annotate restaurants with distance to `destination`, nearest first.
///
/// Unknown distances go last; ties break on restaurant id.
pub fn rank_by_distance<'a>(
    destination: Option<Coordinates>,
    restaurants: impl IntoIterator<Item = &'a Restaurant>,
) -> Vec<CoveringRestaurant> {
    let mut ranked: Vec<CoveringRestaurant> = restaurants
        .into_iter()
        .map(|r| CoveringRestaurant {
            id: r.id,
            name: r.name.clone(),
            distance_km: match (destination, r.coordinates()) {
                (Some(a), Some(b)) => Some(distance_km(a, b)),
                _ => None,
            },
        })
        .collect();

    ranked.sort_by(|a, b| match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => x.total_cmp(&y).then(a.id.cmp(&b.id)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    });
    ranked
}

/// Manager view of one order: line items, total and who can cook it
#[derive(Debug, Clone, Serialize)]
pub struct OrderOverview {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub restaurants: Vec<CoveringRestaurant>,
}

/// Bulk variant: totals and covering restaurants for many orders at once,
/// from one batch of line items and one batch of menu items.
pub fn annotate_orders(
    orders: Vec<Order>,
    items: Vec<OrderItem>,
    restaurants: &[Restaurant],
    menu_items: &[RestaurantMenuItem],
) -> Vec<OrderOverview> {
    let menu = build_menu_index(menu_items);
    let by_id: HashMap<i64, &Restaurant> = restaurants.iter().map(|r| (r.id, r)).collect();

    let mut items_by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for item in items {
        items_by_order.entry(item.order_id).or_default().push(item);
    }

    orders
        .into_iter()
        .map(|order| {
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            let covering = restaurants_covering(&order_products(&items), &menu);
            let restaurants = rank_by_distance(
                order.coordinates(),
                covering.iter().filter_map(|id| by_id.get(id).copied()),
            );
            OrderOverview {
                total: order_total(&items),
                order,
                items,
                restaurants,
            }
        })
        .collect()
}
