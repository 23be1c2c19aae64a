#![allow(dead_code)]

use assert_cmd::cargo_bin;
use serde_json::{Value, json};
use std::fs::File;
use std::io::Error;
use std::path::Path;
use std::process::Command;

pub const SNAPSHOT: &str = "tests/fixtures/snapshot.json";
pub const COORDINATES: &str = "tests/fixtures/coordinates.csv";

/// The binary, pointed at the fixture snapshot and coordinates table.
pub fn foodcart() -> Command {
    let mut cmd = Command::new(cargo_bin!("foodcart"));
    cmd.env_remove("YANDEX_GEOCODER_API_KEY")
        .arg("--snapshot")
        .arg(SNAPSHOT)
        .arg("--coordinates")
        .arg(COORDINATES);
    cmd
}

/// Data rows of a ranking CSV as `(restaurant id, name)`.
pub fn ranked_ids(stdout: &[u8]) -> Vec<(u64, String)> {
    let mut reader = csv::Reader::from_reader(stdout);
    reader
        .records()
        .map(|record| {
            let record = record.expect("Failed to read ranking row");
            (
                record[0].parse().expect("Failed to parse restaurant id"),
                record[1].to_string(),
            )
        })
        .collect()
}

/// Writes a snapshot where every restaurant sells product 1 and a
/// coordinates table placing restaurant `i` `i` hundredths of a degree north
/// of the customer.
pub fn generate_snapshot(
    snapshot: &Path,
    coordinates: &Path,
    restaurants: u64,
) -> Result<(), Error> {
    let restaurant_rows: Vec<Value> = (1..=restaurants)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("Restaurant {i}"),
                "address": format!("Street {i}"),
            })
        })
        .collect();
    let menu_rows: Vec<Value> = (1..=restaurants)
        .map(|i| json!({"restaurant": i, "product": 1}))
        .collect();
    let data = json!({
        "products": [{"id": 1, "name": "Cheeseburger", "price": "250.00"}],
        "restaurants": restaurant_rows,
        "menu_items": menu_rows,
        "orders": [{
            "id": 1,
            "firstname": "Ivan",
            "phonenumber": "+79991234567",
            "address": "Customer",
            "registered_at": "2023-02-27T18:09:00Z",
            "items": [{"product": 1, "quantity": 1, "price": "250.00"}]
        }]
    });
    serde_json::to_writer(File::create(snapshot)?, &data)?;

    let mut wtr = csv::WriterBuilder::new().from_path(coordinates)?;
    wtr.write_record(["address", "lat", "lon"])?;
    wtr.write_record(["Customer", "50.0", "30.0"])?;
    // Reverse order so the ranking has to actually sort.
    for i in (1..=restaurants).rev() {
        let lat = 50.0 + (i as f64) / 100.0;
        wtr.write_record([format!("Street {i}"), lat.to_string(), "30.0".to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}
