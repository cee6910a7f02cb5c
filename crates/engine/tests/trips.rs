mod common;

use common::{count, engine_with_db, grand_tour, user};
use engine::{
    ActivityCategory, ActivityDraft, CityDraft, Currency, EngineError, Money, TripDraft,
    TripPatch, TripStatus,
};
use uuid::Uuid;

#[tokio::test]
async fn euro_trip_defaults() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;

    let draft = TripDraft::new("Euro Trip", "2024-06-01", "2024-06-10")
        .city(CityDraft::new("Paris", "France"))
        .city(CityDraft::new("Rome", "Italy"));
    let trip = engine.create_trip(alice, &draft).await.unwrap();

    assert_eq!(trip.name, "Euro Trip");
    assert_eq!(trip.cities.len(), 2);
    assert_eq!(trip.cities[0].name, "Paris");
    assert_eq!(trip.cities[0].position, 1);
    assert_eq!(trip.cities[1].name, "Rome");
    assert_eq!(trip.cities[1].position, 2);
    assert_eq!(trip.activity_count(), 0);
    assert_eq!(trip.status, TripStatus::Planning);
    assert_eq!(trip.total_spent, Money::ZERO);
    assert_eq!(trip.currency, Currency::Usd);
    assert_eq!(trip.version, 1);
}

#[tokio::test]
async fn positions_follow_document_order() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;

    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();

    let positions: Vec<i32> = trip.cities.iter().map(|c| c.position).collect();
    assert_eq!(positions, vec![1, 2, 3]);
    let paris = &trip.cities[0];
    assert_eq!(paris.activities[0].name, "Louvre");
    assert_eq!(paris.activities[0].position, 1);
    assert_eq!(paris.activities[1].name, "Seine cruise");
    assert_eq!(paris.activities[1].position, 2);
    assert_eq!(paris.activities[0].cost, Money::new(2200));
    assert_eq!(
        trip.cities[1].activities[0].category,
        ActivityCategory::Food
    );
}

#[tokio::test]
async fn read_back_reproduces_the_tree() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;

    let created = engine.create_trip(alice, &grand_tour()).await.unwrap();
    let read = engine.get_trip(alice, created.id).await.unwrap();

    assert_eq!(created, read);
    assert_eq!(read.activity_count(), 3);
    assert_eq!(count(&db, "cities").await, 3);
    assert_eq!(count(&db, "activities").await, 3);
}

#[tokio::test]
async fn invalid_nested_activity_persists_nothing() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;

    let draft = grand_tour().city(
        CityDraft::new("Milan", "Italy")
            .activity(ActivityDraft::new("Duomo", "2024-06-15"))
            .activity(ActivityDraft::new("", "2024-06-16")),
    );

    let err = engine.create_trip(alice, &draft).await.unwrap_err();
    let EngineError::Validation(err) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert_eq!(err.path, "cities[3].activities[1].name");

    assert_eq!(count(&db, "trips").await, 0);
    assert_eq!(count(&db, "cities").await, 0);
    assert_eq!(count(&db, "activities").await, 0);
}

#[tokio::test]
async fn missing_city_country_persists_nothing() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;

    let mut draft = grand_tour();
    draft.cities[2].country = None;

    let err = engine.create_trip(alice, &draft).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(ref v) if v.path == "cities[2].country"));
    assert_eq!(count(&db, "trips").await, 0);
    assert_eq!(count(&db, "cities").await, 0);
}

#[tokio::test]
async fn end_before_start_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;

    let draft = TripDraft::new("Backwards", "2024-06-10", "2024-06-01");
    let err = engine.create_trip(alice, &draft).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(ref v) if v.path == "endDate"));
}

#[tokio::test]
async fn list_is_owner_scoped_and_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;

    let first = engine
        .create_trip(alice, &TripDraft::new("First", "2024-01-01", "2024-01-02"))
        .await
        .unwrap();
    let second = engine
        .create_trip(alice, &TripDraft::new("Second", "2024-02-01", "2024-02-02"))
        .await
        .unwrap();
    engine
        .create_trip(bob, &TripDraft::new("Bob's", "2024-03-01", "2024-03-02"))
        .await
        .unwrap();

    let trips = engine.list_trips(alice).await.unwrap();
    assert_eq!(trips.len(), 2);
    assert!(trips.iter().all(|trip| trip.owner_id == alice));
    let ids: Vec<Uuid> = trips.iter().map(|trip| trip.id).collect();
    assert!(ids.contains(&first.id));
    assert!(ids.contains(&second.id));
}

#[tokio::test]
async fn foreign_trip_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let mallory = user(&engine, "mallory").await;
    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();
    let not_found = EngineError::KeyNotFound("trip".to_string());

    assert_eq!(
        engine.get_trip(mallory, trip.id).await.unwrap_err(),
        not_found
    );
    assert_eq!(
        engine
            .update_trip(mallory, trip.id, &TripPatch::default().name("Mine"))
            .await
            .unwrap_err(),
        not_found
    );
    assert_eq!(
        engine.delete_trip(mallory, trip.id).await.unwrap_err(),
        not_found
    );
    assert_eq!(
        engine.get_trip(alice, Uuid::new_v4()).await.unwrap_err(),
        not_found
    );

    let untouched = engine.get_trip(alice, trip.id).await.unwrap();
    assert_eq!(untouched.name, "Grand Tour");
}

#[tokio::test]
async fn update_replaces_the_whole_tree() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();

    let patch = TripPatch::default().cities(vec![
        CityDraft::new("Berlin", "Germany")
            .activity(ActivityDraft::new("Museum Island", "2024-06-07")),
    ]);
    let updated = engine.update_trip(alice, trip.id, &patch).await.unwrap();

    assert_eq!(updated.cities.len(), 1);
    assert_eq!(updated.cities[0].name, "Berlin");
    assert_eq!(updated.cities[0].position, 1);
    assert_eq!(updated.cities[0].activities.len(), 1);
    assert_eq!(updated.name, "Grand Tour");
    assert_eq!(count(&db, "cities").await, 1);
    assert_eq!(count(&db, "activities").await, 1);
}

#[tokio::test]
async fn scalar_update_keeps_the_tree_and_bumps_version() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();

    let patch = TripPatch::default().name("Renamed").status("confirmed");
    let updated = engine.update_trip(alice, trip.id, &patch).await.unwrap();

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.status, TripStatus::Confirmed);
    assert_eq!(updated.version, trip.version + 1);
    assert_eq!(updated.cities, trip.cities);
}

#[tokio::test]
async fn invalid_replacement_leaves_original_tree() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();

    let patch = TripPatch::default().cities(vec![
        CityDraft::new("Berlin", "Germany"),
        CityDraft::new("Hamburg", ""),
    ]);
    let err = engine.update_trip(alice, trip.id, &patch).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(ref v) if v.path == "cities[1].country"));

    let read = engine.get_trip(alice, trip.id).await.unwrap();
    assert_eq!(read.cities, trip.cities);
    assert_eq!(read.version, trip.version);
    assert_eq!(count(&db, "cities").await, 3);
}

#[tokio::test]
async fn stale_version_is_a_conflict() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();

    engine
        .update_trip(
            alice,
            trip.id,
            &TripPatch::default().name("One").expected_version(trip.version),
        )
        .await
        .unwrap();
    let err = engine
        .update_trip(
            alice,
            trip.id,
            &TripPatch::default().name("Two").expected_version(trip.version),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::VersionConflict(_)));
    assert_eq!(engine.get_trip(alice, trip.id).await.unwrap().name, "One");
}

#[tokio::test]
async fn delete_hides_the_tree_and_restore_brings_it_back() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();

    engine.delete_trip(alice, trip.id).await.unwrap();
    assert_eq!(
        engine.get_trip(alice, trip.id).await.unwrap_err(),
        EngineError::KeyNotFound("trip".to_string())
    );
    assert!(engine.list_trips(alice).await.unwrap().is_empty());
    assert_eq!(count(&db, "trips").await, 1);

    let restored = engine.restore_trip(alice, trip.id).await.unwrap();
    assert_eq!(restored.cities, trip.cities);
    assert_eq!(engine.list_trips(alice).await.unwrap().len(), 1);
}

#[tokio::test]
async fn restoring_a_live_trip_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();

    assert!(matches!(
        engine.restore_trip(alice, trip.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn hard_deleting_a_trip_cascades() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();

    common::exec(&db, &format!("DELETE FROM trips WHERE id = '{}'", trip.id)).await;
    assert_eq!(count(&db, "cities").await, 0);
    assert_eq!(count(&db, "activities").await, 0);
}
