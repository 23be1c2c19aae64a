use crate::error::{FoodCartError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

macro_rules! entity_id {
    ($name:ident, $label:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} {}", $label, self.0)
            }
        }
    };
}

entity_id!(ProductId, "product");
entity_id!(RestaurantId, "restaurant");
entity_id!(CategoryId, "category");

/// Largest price a product or order line may carry: eight digits, two of
/// them after the decimal point.
pub const MAX_PRICE: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);

/// Rejects negative prices, more than two decimal places and anything above
/// [`MAX_PRICE`].
pub fn check_price(price: Decimal, owner: impl fmt::Display) -> Result<()> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(FoodCartError::ValidationError(format!(
            "{owner} has a negative price"
        )));
    }
    if price.normalize().scale() > 2 {
        return Err(FoodCartError::ValidationError(format!(
            "{owner} price {price} has more than two decimal places"
        )));
    }
    if price > MAX_PRICE {
        return Err(FoodCartError::ValidationError(format!(
            "{owner} price {price} exceeds {MAX_PRICE}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCategory {
    pub id: CategoryId,
    pub name: String,
}

/// A dish that restaurants may offer.
///
/// Availability is not a property of the product: it lives on the
/// [`MenuItem`] joining a product to a restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub special_status: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    /// Free-text address, also used as the geocode cache key.
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact_phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub restaurant: RestaurantId,
    pub product: ProductId,
    #[serde(default = "default_availability")]
    pub availability: bool,
}

fn default_availability() -> bool {
    true
}

/// Restaurants, products and the menu joining them.
///
/// Menu items are unique per `(restaurant, product)` pair; setting an item
/// for an existing pair replaces the previous one.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    categories: BTreeMap<CategoryId, ProductCategory>,
    products: BTreeMap<ProductId, Product>,
    restaurants: BTreeMap<RestaurantId, Restaurant>,
    menu: BTreeMap<(RestaurantId, ProductId), bool>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_category(&mut self, category: ProductCategory) {
        self.categories.insert(category.id, category);
    }

    pub fn add_product(&mut self, product: Product) -> Result<()> {
        check_price(product.price, product.id)?;
        if let Some(category) = product.category
            && !self.categories.contains_key(&category)
        {
            return Err(FoodCartError::NotFound(category.to_string()));
        }
        self.products.insert(product.id, product);
        Ok(())
    }

    pub fn add_restaurant(&mut self, restaurant: Restaurant) {
        self.restaurants.insert(restaurant.id, restaurant);
    }

    /// Inserts or replaces the menu item for the pair.
    pub fn set_menu_item(&mut self, item: MenuItem) -> Result<()> {
        if !self.restaurants.contains_key(&item.restaurant) {
            return Err(FoodCartError::NotFound(item.restaurant.to_string()));
        }
        if !self.products.contains_key(&item.product) {
            return Err(FoodCartError::NotFound(item.product.to_string()));
        }
        self.menu
            .insert((item.restaurant, item.product), item.availability);
        Ok(())
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    pub fn restaurant(&self, id: RestaurantId) -> Option<&Restaurant> {
        self.restaurants.get(&id)
    }

    pub fn category(&self, id: CategoryId) -> Option<&ProductCategory> {
        self.categories.get(&id)
    }

    pub fn restaurants(&self) -> impl Iterator<Item = &Restaurant> {
        self.restaurants.values()
    }

    pub fn menu_items(&self) -> impl Iterator<Item = MenuItem> + '_ {
        self.menu
            .iter()
            .map(|(&(restaurant, product), &availability)| MenuItem {
                restaurant,
                product,
                availability,
            })
    }

    /// Restaurants that currently offer `product` (menu item present and available).
    pub fn restaurants_with_available(&self, product: ProductId) -> HashSet<RestaurantId> {
        self.menu
            .iter()
            .filter(|&(&(_, p), &available)| p == product && available)
            .map(|(&(restaurant, _), _)| restaurant)
            .collect()
    }

    /// Products offered by at least one restaurant, in id order.
    pub fn available_products(&self) -> Vec<&Product> {
        let offered: HashSet<ProductId> = self
            .menu
            .iter()
            .filter(|&(_, &available)| available)
            .map(|(&(_, product), _)| product)
            .collect();
        self.products
            .values()
            .filter(|product| offered.contains(&product.id))
            .collect()
    }
}
