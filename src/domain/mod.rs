//! Domain model: catalog, orders, geocoded places and the ports the
//! application layer depends on.

pub mod catalog;
pub mod order;
pub mod place;
pub mod ports;
