use crate::domain::catalog::{Catalog, ProductId};
use crate::domain::order::{NewOrder, OrderItem, PaymentMethod};
use crate::error::{FoodCartError, Result};
use serde::Deserialize;

pub const MISSING_PRODUCTS: &str = "products key not presented or not list";

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
pub struct ProductLine {
    pub product: ProductId,
    pub quantity: u32,
}

/// A customer's order as submitted through the API.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct OrderSubmission {
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    pub phonenumber: String,
    pub address: String,
    pub products: Vec<ProductLine>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

/// Validates a submission against the catalog and snapshots current prices.
pub fn validate(catalog: &Catalog, submission: OrderSubmission) -> Result<NewOrder> {
    if submission.products.is_empty() {
        return Err(FoodCartError::ValidationError(MISSING_PRODUCTS.to_string()));
    }
    let firstname = required("firstname", &submission.firstname)?;
    let address = required("address", &submission.address)?;
    let phonenumber = normalize_phone(&submission.phonenumber)?;

    let items = submission
        .products
        .iter()
        .map(|line| {
            if line.quantity == 0 {
                return Err(FoodCartError::ValidationError(format!(
                    "quantity for {} must be at least 1",
                    line.product
                )));
            }
            let product = catalog
                .product(line.product)
                .ok_or_else(|| FoodCartError::NotFound(line.product.to_string()))?;
            Ok(OrderItem {
                product: product.id,
                quantity: line.quantity,
                price: product.price,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(NewOrder {
        firstname,
        lastname: submission.lastname.trim().to_string(),
        phonenumber,
        address,
        comment: submission.comment.trim().to_string(),
        payment_method: submission.payment_method,
        items,
    })
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FoodCartError::ValidationError(format!(
            "{field} must not be empty"
        )));
    }
    Ok(value.to_string())
}

/// Accepts digits with an optional leading `+`; spaces, dashes and
/// parentheses are dropped. 10 to 15 digits, as in E.164.
fn normalize_phone(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let (plus, rest) = match raw.strip_prefix('+') {
        Some(rest) => ("+", rest),
        None => ("", raw),
    };
    let mut digits = String::with_capacity(rest.len());
    for c in rest.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '(' | ')' => {}
            _ => {
                return Err(FoodCartError::ValidationError(format!(
                    "phonenumber is not a valid phone number: {raw}"
                )));
            }
        }
    }
    if !(10..=15).contains(&digits.len()) {
        return Err(FoodCartError::ValidationError(format!(
            "phonenumber is not a valid phone number: {raw}"
        )));
    }
    Ok(format!("{plus}{digits}"))
}
