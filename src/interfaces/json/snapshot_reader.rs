use crate::domain::catalog::{Catalog, MenuItem, Product, ProductCategory, Restaurant};
use crate::domain::order::Order;
use crate::error::Result;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct Snapshot {
    categories: Vec<ProductCategory>,
    products: Vec<Product>,
    restaurants: Vec<Restaurant>,
    menu_items: Vec<MenuItem>,
    orders: Vec<Order>,
}

/// Loads a back office snapshot: catalog entities plus existing orders.
///
/// Entities are inserted in dependency order, so a menu item naming an
/// unknown restaurant or product fails the whole load.
pub struct SnapshotReader<R: Read> {
    source: R,
}

impl<R: Read> SnapshotReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn read(self) -> Result<(Catalog, Vec<Order>)> {
        let snapshot: Snapshot = serde_json::from_reader(self.source)?;

        let mut catalog = Catalog::new();
        for category in snapshot.categories {
            catalog.add_category(category);
        }
        for product in snapshot.products {
            catalog.add_product(product)?;
        }
        for restaurant in snapshot.restaurants {
            catalog.add_restaurant(restaurant);
        }
        for item in snapshot.menu_items {
            catalog.set_menu_item(item)?;
        }
        for order in &snapshot.orders {
            order.check_prices()?;
        }
        Ok((catalog, snapshot.orders))
    }
}
