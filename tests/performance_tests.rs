use std::time::{Duration, Instant};

mod common;

#[test]
fn test_rank_many_restaurants() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("snapshot.json");
    let coordinates = dir.path().join("coordinates.csv");
    common::generate_snapshot(&snapshot, &coordinates, 500).expect("Failed to generate snapshot");

    let mut cmd = std::process::Command::new(assert_cmd::cargo_bin!("foodcart"));
    cmd.env_remove("YANDEX_GEOCODER_API_KEY")
        .arg("--snapshot")
        .arg(&snapshot)
        .arg("--coordinates")
        .arg(&coordinates)
        .args(["candidates", "1"]);

    let started = Instant::now();
    let output = cmd.output().expect("Failed to execute command");
    assert!(output.status.success());
    assert!(started.elapsed() < Duration::from_secs(30));

    let ranked = common::ranked_ids(&output.stdout);
    assert_eq!(ranked.len(), 500);
    let ids: Vec<u64> = ranked.iter().map(|(id, _)| *id).collect();
    let expected: Vec<u64> = (1..=500).collect();
    assert_eq!(ids, expected);
}
