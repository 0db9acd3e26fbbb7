//! Order Model
//!
//! An order is captured from the storefront with its line items; each line
//! item carries the product price copied at the moment it was created.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::Coordinates;
use crate::error::{AppError, AppResult, ErrorCode};

/// Unknown enum value read from a TEXT column
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Order processing status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Registered, nobody has called the customer yet
    #[default]
    New,
    /// Accepted and being prepared or delivered
    InProgress,
    /// Delivered
    Completed,
}

impl OrderStatus {
    /// Parse from database string value
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Database string representation
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::New => 0,
            Self::InProgress => 1,
            Self::Completed => 2,
        }
    }

    /// Status only moves forward; staying put is allowed.
    pub fn check_transition(&self, next: OrderStatus) -> AppResult<()> {
        if *self == next {
            return Ok(());
        }
        if *self == Self::Completed {
            return Err(AppError::new(ErrorCode::OrderAlreadyCompleted));
        }
        if next.rank() < self.rank() {
            return Err(AppError::with_message(
                ErrorCode::OrderInvalidStatusTransition,
                format!(
                    "Cannot move order from '{}' back to '{}'",
                    self.as_db(),
                    next.as_db()
                ),
            ));
        }
        Ok(())
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_db(&value).ok_or(UnknownVariant {
            kind: "order status",
            value,
        })
    }
}

/// How the customer pays
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Card, to the courier
    Online,
    /// Cash, to the courier
    #[default]
    Cash,
    /// Paid in advance
    Prepayment,
}

impl PaymentMethod {
    /// Parse from database string value
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "online" => Some(Self::Online),
            "cash" => Some(Self::Cash),
            "prepayment" => Some(Self::Prepayment),
            _ => None,
        }
    }

    /// Database string representation
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Cash => "cash",
            Self::Prepayment => "prepayment",
        }
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_db(&value).ok_or(UnknownVariant {
            kind: "payment method",
            value,
        })
    }
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    /// Normalized phone number (E.164)
    pub phonenumber: String,
    /// Delivery address
    pub address: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub status: OrderStatus,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub payment: PaymentMethod,
    pub registered_at: i64,
    pub called_at: Option<i64>,
    pub delivered_at: Option<i64>,
    pub comment: String,
    /// Restaurant assigned by a manager (NULL if deleted)
    pub restaurant_id: Option<i64>,
}

impl Order {
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_columns(self.longitude, self.latitude)
    }
}

/// Order line item ("order product")
///
/// `price` is the product price snapshot taken when the line was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub price: Decimal,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}

/// One requested line of a storefront order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct OrderLineInput {
    /// Product id
    pub product: i64,
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, max = 1000, message = "must be between 1 and 1000"))]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

/// Storefront order registration payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterOrderRequest {
    #[validate(length(min = 1, max = 30, message = "must be 1-30 characters"))]
    pub firstname: String,
    #[validate(length(min = 1, max = 30, message = "must be 1-30 characters"))]
    pub lastname: String,
    #[validate(custom(function = "validate_phone"))]
    pub phonenumber: String,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub address: String,
    #[serde(default)]
    #[validate(nested)]
    pub products: Vec<OrderLineInput>,
    #[serde(default)]
    pub payment: Option<PaymentMethod>,
    #[serde(default)]
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub comment: Option<String>,
}

impl RegisterOrderRequest {
    /// Field validation plus the non-empty products rule
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        if self.products.is_empty() {
            return Err(AppError::new(ErrorCode::OrderEmpty).with_detail("field", "products"));
        }
        Ok(())
    }
}

/// Manager-side order update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub payment: Option<PaymentMethod>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub comment: Option<String>,
    /// Assign a restaurant; it must cover every product of the order
    pub restaurant_id: Option<i64>,
    pub called_at: Option<i64>,
    pub delivered_at: Option<i64>,
}

/// Manager-side line item quantity change
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemUpdate {
    #[validate(range(min = 1, max = 1000, message = "must be between 1 and 1000"))]
    pub quantity: i32,
}

/// Normalize a phone number to E.164.
///
/// Separators (spaces, dashes, dots, parentheses) are dropped. Numbers
/// without a country code default to Russia: `8XXXXXXXXXX`, `7XXXXXXXXXX`
/// and bare ten-digit numbers become `+7XXXXXXXXXX`.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let (plus, rest) = match trimmed.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let mut digits = String::with_capacity(rest.len());
    for c in rest.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return None,
        }
    }

    if plus {
        return (10..=15).contains(&digits.len()).then(|| format!("+{digits}"));
    }
    match digits.len() {
        11 if digits.starts_with('8') || digits.starts_with('7') => {
            Some(format!("+7{}", &digits[1..]))
        }
        10 => Some(format!("+7{digits}")),
        _ => None,
    }
}

fn validate_phone(value: &str) -> Result<(), ValidationError> {
    match normalize_phone(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("phone").with_message("invalid phone number".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> RegisterOrderRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn status_db_roundtrip() {
        for status in [
            OrderStatus::New,
            OrderStatus::InProgress,
            OrderStatus::Completed,
        ] {
            assert_eq!(OrderStatus::from_db(status.as_db()), Some(status));
            assert_eq!(OrderStatus::try_from(status.as_db().to_string()), Ok(status));
        }
        assert!(OrderStatus::try_from("N".to_string()).is_err());
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(OrderStatus::default(), OrderStatus::New);
    }

    #[test]
    fn status_only_moves_forward() {
        assert!(OrderStatus::New.check_transition(OrderStatus::InProgress).is_ok());
        assert!(OrderStatus::New.check_transition(OrderStatus::Completed).is_ok());
        assert!(OrderStatus::InProgress.check_transition(OrderStatus::InProgress).is_ok());

        let err = OrderStatus::InProgress
            .check_transition(OrderStatus::New)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderInvalidStatusTransition);

        let err = OrderStatus::Completed
            .check_transition(OrderStatus::InProgress)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderAlreadyCompleted);
    }

    #[test]
    fn payment_defaults_to_cash() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
        assert_eq!(PaymentMethod::from_db("prepayment"), Some(PaymentMethod::Prepayment));
        assert_eq!(PaymentMethod::from_db("I"), None);
    }

    #[test]
    fn line_total_multiplies_snapshot_price() {
        let item = OrderItem {
            id: 1,
            order_id: 1,
            product_id: 1,
            quantity: 3,
            price: Decimal::new(1050, 2),
        };
        assert_eq!(item.line_total(), Decimal::new(3150, 2));
    }

    #[test]
    fn phone_normalization() {
        assert_eq!(normalize_phone("+7 (981) 199-09-93").as_deref(), Some("+79811990993"));
        assert_eq!(normalize_phone("89811990993").as_deref(), Some("+79811990993"));
        assert_eq!(normalize_phone("0981990993").as_deref(), Some("+70981990993"));
        assert_eq!(normalize_phone("+380981990993").as_deref(), Some("+380981990993"));
        assert_eq!(normalize_phone("12345"), None);
        assert_eq!(normalize_phone("call me"), None);
        assert_eq!(normalize_phone(""), None);
    }

    #[test]
    fn register_request_accepts_storefront_payload() {
        let req = request(
            r#"{"products":[{"product":2,"quantity":1}],"firstname":"Артем","lastname":"Иванов","phonenumber":"+79811990993","address":"Московский проспект 9"}"#,
        );
        assert!(req.check().is_ok());
        assert_eq!(req.payment, None);
        assert_eq!(req.products[0], OrderLineInput { product: 2, quantity: 1 });
    }

    #[test]
    fn register_request_reports_fields() {
        let req = request(
            r#"{"products":[{"product":2,"quantity":0}],"firstname":"","lastname":"Иванов","phonenumber":"nope","address":"Невский 1"}"#,
        );
        let err = req.check().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert!(details.contains_key("firstname"));
        assert!(details.contains_key("phonenumber"));
        assert!(details.contains_key("products[0].quantity"));
        assert!(!details.contains_key("lastname"));
    }

    #[test]
    fn register_request_requires_products() {
        let req = request(
            r#"{"products":[],"firstname":"Артем","lastname":"Иванов","phonenumber":"+79811990993","address":"Невский 1"}"#,
        );
        assert_eq!(req.check().unwrap_err().code, ErrorCode::OrderEmpty);
    }

    #[test]
    fn missing_quantity_defaults_to_one() {
        let line: OrderLineInput = serde_json::from_str(r#"{"product":5}"#).unwrap();
        assert_eq!(line.quantity, 1);
    }
}
