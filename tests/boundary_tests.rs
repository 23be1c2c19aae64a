use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;

mod common;

#[test]
fn test_unknown_order_id() {
    common::foodcart()
        .args(["candidates", "18446744073709551615"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("order 18446744073709551615 not found"));
}

#[test]
fn test_assign_unknown_restaurant() {
    common::foodcart()
        .args(["assign", "1", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("restaurant 99 not found"));
}

#[test]
fn test_order_with_unknown_product() {
    let mut order = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        order,
        r#"{{"firstname": "Anna", "phonenumber": "+79165551234", "address": "Moscow",
            "products": [{{"product": 1, "quantity": 1}}, {{"product": 404, "quantity": 1}}]}}"#
    )
    .unwrap();

    common::foodcart()
        .arg("register")
        .arg(order.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("product 404 not found"));
}

#[test]
fn test_large_quantity_total() -> Result<(), Box<dyn std::error::Error>> {
    let mut order = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        order,
        r#"{{"firstname": "Anna", "phonenumber": "+79165551234", "address": "Moscow, Tverskaya 1",
            "products": [{{"product": 2, "quantity": 4294967295}}]}}"#
    )?;

    let output = common::foodcart()
        .arg("register")
        .arg(order.path())
        .output()?;
    assert!(output.status.success());

    let order: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(order["items"][0]["quantity"], 4294967295u64);
    assert_eq!(order["items"][0]["price"], "99.00");
    Ok(())
}

#[test]
fn test_blank_geocode_address() {
    common::foodcart()
        .args(["geocode", "   "])
        .assert()
        .success()
        .stdout("unknown\n");
}
