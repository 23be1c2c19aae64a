use super::catalog::{ProductId, RestaurantId, check_price};
use crate::error::{FoodCartError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order {}", self.0)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Unprocessed,
    Preparing,
    OutForDelivery,
    Delivered,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Electronic,
    Cash,
}

/// A line of an order.
///
/// `price` is a snapshot of the product price when the order was placed, so
/// later price changes never rewrite historical orders.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct OrderItem {
    pub product: ProductId,
    pub quantity: u32,
    pub price: Decimal,
}

impl OrderItem {
    pub fn cost(&self) -> Result<Decimal> {
        self.price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or_else(|| {
                FoodCartError::ValidationError(format!("cost of {} overflows", self.product))
            })
    }
}

/// Everything needed to create an order, before an id is allocated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub firstname: String,
    pub lastname: String,
    pub phonenumber: String,
    pub address: String,
    pub comment: String,
    pub payment_method: Option<PaymentMethod>,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Order {
    pub id: OrderId,
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    pub phonenumber: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    pub registered_at: DateTime<Utc>,
    #[serde(default)]
    pub called_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
    /// Restaurant chosen by staff. Once set, it overrides availability resolution.
    #[serde(default)]
    pub restaurant: Option<RestaurantId>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn from_new(id: OrderId, new: NewOrder, registered_at: DateTime<Utc>) -> Self {
        Self {
            id,
            firstname: new.firstname,
            lastname: new.lastname,
            phonenumber: new.phonenumber,
            address: new.address,
            status: OrderStatus::Unprocessed,
            comment: new.comment,
            payment_method: new.payment_method,
            registered_at,
            called_at: None,
            delivered_at: None,
            restaurant: None,
            items: new.items,
        }
    }

    /// Hands the order to a restaurant; the kitchen starts preparing it.
    pub fn assign_restaurant(&mut self, restaurant: RestaurantId) {
        self.restaurant = Some(restaurant);
        self.status = OrderStatus::Preparing;
    }

    /// Returns true when the address actually changed.
    pub fn update_address(&mut self, address: &str) -> bool {
        let address = address.trim();
        if self.address == address {
            return false;
        }
        self.address = address.to_string();
        true
    }

    pub fn product_ids(&self) -> Vec<ProductId> {
        self.items.iter().map(|item| item.product).collect()
    }

    pub fn total_cost(&self) -> Result<Decimal> {
        self.items.iter().try_fold(Decimal::ZERO, |total, item| {
            total.checked_add(item.cost()?).ok_or_else(|| {
                FoodCartError::ValidationError(format!("total cost of {} overflows", self.id))
            })
        })
    }

    /// Checks the snapshot prices of every line, for orders loaded from
    /// outside intake.
    pub fn check_prices(&self) -> Result<()> {
        for item in &self.items {
            check_price(item.price, format_args!("{} line {}", self.id, item.product))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn order() -> Order {
        Order::from_new(
            OrderId(1),
            NewOrder {
                firstname: "Ivan".to_string(),
                lastname: "Petrov".to_string(),
                phonenumber: "+79991234567".to_string(),
                address: "Moscow, Tverskaya 1".to_string(),
                comment: String::new(),
                payment_method: Some(PaymentMethod::Cash),
                items: vec![
                    OrderItem {
                        product: ProductId(1),
                        quantity: 2,
                        price: dec!(350.00),
                    },
                    OrderItem {
                        product: ProductId(2),
                        quantity: 1,
                        price: dec!(99.50),
                    },
                ],
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_new_order_is_unprocessed() {
        let order = order();
        assert_eq!(order.status, OrderStatus::Unprocessed);
        assert!(order.restaurant.is_none());
    }

    #[test]
    fn test_total_cost_uses_snapshot_prices() {
        let order = order();
        assert_eq!(order.items[0].cost().unwrap(), dec!(700.00));
        assert_eq!(order.total_cost().unwrap(), dec!(799.50));
    }

    #[test]
    fn test_total_cost_overflow_is_an_error() {
        let mut order = order();
        order.items[0].price = Decimal::MAX;
        assert!(matches!(
            order.items[0].cost(),
            Err(FoodCartError::ValidationError(_))
        ));
        assert!(order.total_cost().is_err());
        assert!(order.check_prices().is_err());

        order.items[0].quantity = 1;
        order.items[1].price = Decimal::MAX;
        assert!(matches!(
            order.total_cost(),
            Err(FoodCartError::ValidationError(_))
        ));
    }

    #[test]
    fn test_check_prices() {
        let mut order = order();
        assert!(order.check_prices().is_ok());
        order.items[1].price = dec!(9.999);
        assert!(matches!(
            order.check_prices(),
            Err(FoodCartError::ValidationError(_))
        ));
    }

    #[test]
    fn test_assign_restaurant_moves_to_preparing() {
        let mut order = order();
        order.assign_restaurant(RestaurantId(7));
        assert_eq!(order.restaurant, Some(RestaurantId(7)));
        assert_eq!(order.status, OrderStatus::Preparing);
    }

    #[test]
    fn test_update_address_reports_change() {
        let mut order = order();
        assert!(!order.update_address("Moscow, Tverskaya 1 "));
        assert!(order.update_address("Moscow, Arbat 5"));
        assert_eq!(order.address, "Moscow, Arbat 5");
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&OrderStatus::OutForDelivery).unwrap();
        assert_eq!(json, "\"out_for_delivery\"");
    }
}
