pub mod order_reader;
pub mod snapshot_reader;
