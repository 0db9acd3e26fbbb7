//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult, ErrorCode};

/// Largest price a `NUMERIC(8, 2)` column holds
pub const MAX_PRICE: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Category reference (NULL once the category is deleted)
    pub category_id: Option<i64>,
    pub price: Decimal,
    /// Stored image path, relative to the media root
    pub image: String,
    /// Special offer flag
    pub special_status: bool,
    pub description: String,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub name: String,
    pub category_id: Option<i64>,
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub special_status: bool,
    #[serde(default)]
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub description: String,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductUpdate {
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub name: Option<String>,
    /// Absent keeps the category, `null` clears it
    #[serde(
        default,
        deserialize_with = "crate::util::deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_id: Option<Option<i64>>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub special_status: Option<bool>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub description: Option<String>,
}

/// Reject prices a storefront cannot sell at.
///
/// Negative prices are a data-entry error; anything above `MAX_PRICE` or
/// with more than two decimal places would not fit the price column.
pub fn validate_price(price: Decimal) -> AppResult<()> {
    if price < Decimal::ZERO {
        return Err(AppError::new(ErrorCode::ProductInvalidPrice)
            .with_detail("field", "price")
            .with_detail("value", price.to_string()));
    }
    if price > MAX_PRICE || price.normalize().scale() > 2 {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            format!("Price must be at most {MAX_PRICE} with two decimal places"),
        )
        .with_detail("field", "price")
        .with_detail("value", price.to_string()));
    }
    Ok(())
}

impl ProductCreate {
    /// Field validation plus the price rule
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        validate_price(self.price)
    }
}

impl ProductUpdate {
    /// Field validation plus the price rule (when a price is given)
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        match self.price {
            Some(price) => validate_price(price),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn zero_and_positive_prices_are_valid() {
        assert!(validate_price(dec("0")).is_ok());
        assert!(validate_price(dec("0.00")).is_ok());
        assert!(validate_price(dec("350.00")).is_ok());
        assert!(validate_price(dec("999999.99")).is_ok());
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = validate_price(dec("-0.01")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductInvalidPrice);
        assert_eq!(err.details.unwrap().get("field").unwrap(), "price");
    }

    #[test]
    fn out_of_column_prices_are_rejected() {
        assert!(validate_price(dec("1000000.00")).is_err());
        assert!(validate_price(dec("1.005")).is_err());
        // Trailing zeros do not count as extra precision
        assert!(validate_price(dec("1.500")).is_ok());
    }

    #[test]
    fn create_payload_checks_name_and_price() {
        let payload: ProductCreate =
            serde_json::from_str(r#"{"name":"Чизбургер","price":"189.00"}"#).unwrap();
        assert!(payload.check().is_ok());
        assert!(payload.image.is_empty());
        assert!(!payload.special_status);

        let payload: ProductCreate =
            serde_json::from_str(r#"{"name":"","price":"189.00"}"#).unwrap();
        assert_eq!(payload.check().unwrap_err().code, ErrorCode::ValidationFailed);

        let payload: ProductCreate =
            serde_json::from_str(r#"{"name":"Cola","price":-5}"#).unwrap();
        assert_eq!(
            payload.check().unwrap_err().code,
            ErrorCode::ProductInvalidPrice
        );
    }

    #[test]
    fn update_without_price_skips_price_rule() {
        let payload: ProductUpdate = serde_json::from_str(r#"{"name":"Cola"}"#).unwrap();
        assert!(payload.check().is_ok());

        let payload: ProductUpdate = serde_json::from_str(r#"{"price":"-1"}"#).unwrap();
        assert!(payload.check().is_err());
    }

    #[test]
    fn update_tells_absent_category_from_null() {
        let payload: ProductUpdate = serde_json::from_str(r#"{"name":"Cola"}"#).unwrap();
        assert_eq!(payload.category_id, None);

        let payload: ProductUpdate = serde_json::from_str(r#"{"category_id":null}"#).unwrap();
        assert_eq!(payload.category_id, Some(None));

        let payload: ProductUpdate = serde_json::from_str(r#"{"category_id":4}"#).unwrap();
        assert_eq!(payload.category_id, Some(Some(4)));
        assert!(payload.check().is_ok());
    }
}
