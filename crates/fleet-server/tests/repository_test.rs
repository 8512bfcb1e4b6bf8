//! Repository integration tests against an in-memory store.

use chrono::NaiveDate;
use fleet_core::Drone;
use fleet_server::persistence::{init_database, DroneRepository, InsertOutcome};

async fn test_repository() -> DroneRepository {
    let db = init_database(":memory:", 1).await.expect("init db");
    DroneRepository::new(db.pool().clone())
}

fn sample_drone(serial: &str, model: &str) -> Drone {
    Drone {
        serial_number: Some(serial.to_string()),
        model: Some(model.to_string()),
        manufacturer: Some("Aerotek".to_string()),
        max_altitude: Some(120.0),
        max_speed: Some(20.0),
        max_flight_time: Some(35.0),
        max_flight_dist: Some(8000.0),
        payload: Some(1.2),
        battery_capacity: Some(5200.0),
        n_rotors: Some(4),
        purchase_date: NaiveDate::from_ymd_opt(2023, 1, 15),
        year: Some(2023),
        ..Drone::default()
    }
}

#[tokio::test]
async fn test_next_identity_on_empty_store_is_one() {
    let repo = test_repository().await;

    assert_eq!(repo.next_identity().await.unwrap(), 1);
}

#[tokio::test]
async fn test_next_identity_is_max_plus_one() {
    let repo = test_repository().await;

    let mut drone = sample_drone("SN-1", "Hawk");
    drone.id = Some(5);
    repo.add(&mut drone).await.unwrap();

    assert_eq!(repo.next_identity().await.unwrap(), 6);
}

#[tokio::test]
async fn test_insert_then_fetch_round_trips_all_fields() {
    let repo = test_repository().await;

    let mut drone = sample_drone("SN-1", "Hawk");
    let outcome = repo.add(&mut drone).await.unwrap();
    let id = match outcome {
        InsertOutcome::Inserted { id } => id,
        other => panic!("expected insert, got {:?}", other),
    };
    assert_eq!(drone.id, Some(id));

    let fetched = repo
        .get_by_id(id)
        .await
        .unwrap()
        .expect("drone should exist");

    // Field-by-field comparison; entity equality alone only covers the
    // identity pair.
    assert_eq!(
        serde_json::to_value(&fetched).unwrap(),
        serde_json::to_value(&drone).unwrap()
    );
}

#[tokio::test]
async fn test_duplicate_insert_is_reported_and_ignored() {
    let repo = test_repository().await;

    let mut original = sample_drone("SN-1", "Hawk");
    repo.add(&mut original).await.unwrap();
    let id = original.id.unwrap();

    let mut duplicate = sample_drone("SN-2", "Raven");
    duplicate.id = Some(id);
    let outcome = repo.add(&mut duplicate).await.unwrap();

    assert_eq!(outcome, InsertOutcome::DuplicateIgnored);

    // Nothing was written: the stored row is still the original.
    let stored = repo.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.serial_number.as_deref(), Some("SN-1"));
}

#[tokio::test]
async fn test_listing_order_and_identity_variants() {
    let repo = test_repository().await;

    repo.add(&mut sample_drone("SN-B", "Hawk")).await.unwrap();
    repo.add(&mut sample_drone("SN-A", "Raven")).await.unwrap();
    repo.add(&mut sample_drone("SN-C", "Kite")).await.unwrap();

    let stripped = repo.list_all("serial_number").await.unwrap();
    let with_ids = repo.list_all_with_identity("serial_number").await.unwrap();

    let serials: Vec<_> = stripped
        .iter()
        .map(|d| d.serial_number.clone().unwrap())
        .collect();
    assert_eq!(serials, vec!["SN-A", "SN-B", "SN-C"]);

    assert!(stripped.iter().all(|d| d.id.is_none()));
    assert!(with_ids.iter().all(|d| d.id.is_some()));

    // Same set, same order
    assert_eq!(stripped, with_ids);
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let repo = test_repository().await;

    // Removing an id that never existed is a no-op
    repo.remove(41).await.unwrap();

    let mut drone = sample_drone("SN-1", "Hawk");
    repo.add(&mut drone).await.unwrap();
    let id = drone.id.unwrap();

    repo.remove(id).await.unwrap();
    assert!(repo.get_by_id(id).await.unwrap().is_none());

    repo.remove(id).await.unwrap();
}

#[tokio::test]
async fn test_partial_update_by_field_name() {
    let repo = test_repository().await;

    let mut drone = sample_drone("SN-1", "Hawk");
    repo.add(&mut drone).await.unwrap();
    let id = drone.id.unwrap();

    let fields = vec![
        ("model".to_string(), "Raven".to_string()),
        ("max_speed".to_string(), "33.5".to_string()),
    ];
    repo.update(id, &fields).await.unwrap();

    let updated = repo.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(updated.model.as_deref(), Some("Raven"));
    assert_eq!(updated.max_speed, Some(33.5));
    // Untouched fields survive
    assert_eq!(updated.serial_number.as_deref(), Some("SN-1"));
}

#[tokio::test]
async fn test_update_with_unknown_column_is_rejected() {
    let repo = test_repository().await;

    let mut drone = sample_drone("SN-1", "Hawk");
    repo.add(&mut drone).await.unwrap();
    let id = drone.id.unwrap();

    let fields = vec![("no_such_column".to_string(), "x".to_string())];
    assert!(repo.update(id, &fields).await.is_err());
}
