use crate::application::intake::{MISSING_PRODUCTS, OrderSubmission};
use crate::error::{FoodCartError, Result};
use serde_json::Value;
use std::io::Read;

/// Parses an order submission, rejecting it unless `products` is a
/// non-empty list.
pub fn read_submission<R: Read>(source: R) -> Result<OrderSubmission> {
    let value: Value = serde_json::from_reader(source)?;
    match value.get("products") {
        Some(Value::Array(products)) if !products.is_empty() => {}
        _ => return Err(FoodCartError::ValidationError(MISSING_PRODUCTS.to_string())),
    }
    serde_json::from_value(value)
        .map_err(|e| FoodCartError::ValidationError(format!("Invalid order: {e}")))
}
