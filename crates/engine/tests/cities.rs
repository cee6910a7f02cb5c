mod common;

use common::{count, engine_with_db, grand_tour, user};
use engine::{ActivityDraft, CityDraft, EngineError, Money, ValidationError};
use uuid::Uuid;

fn names(trip: &engine::Trip) -> Vec<&str> {
    trip.cities.iter().map(|city| city.name.as_str()).collect()
}

fn positions(trip: &engine::Trip) -> Vec<i32> {
    trip.cities.iter().map(|city| city.position).collect()
}

#[tokio::test]
async fn added_city_goes_last() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();

    let city = engine
        .add_city(
            alice,
            trip.id,
            &CityDraft::new("Milan", "Italy")
                .activity(ActivityDraft::new("Duomo", "2024-06-15"))
                .activity(ActivityDraft::new("Navigli", "2024-06-16").cost("12")),
        )
        .await
        .unwrap();

    assert_eq!(city.position, 4);
    assert_eq!(city.trip_id, trip.id);
    let activity_positions: Vec<i32> = city.activities.iter().map(|a| a.position).collect();
    assert_eq!(activity_positions, vec![1, 2]);

    let trip = engine.get_trip(alice, trip.id).await.unwrap();
    assert_eq!(names(&trip), vec!["Paris", "Lyon", "Geneva", "Milan"]);
    assert_eq!(positions(&trip), vec![1, 2, 3, 4]);
    assert_eq!(trip.version, 2);
}

#[tokio::test]
async fn invalid_city_is_rejected_without_writes() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();

    let mut broken = ActivityDraft::new("Duomo", "2024-06-15");
    broken.name = None;
    let err = engine
        .add_city(
            alice,
            trip.id,
            &CityDraft::new("Milan", "Italy").activity(broken),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::Validation(ValidationError::required("activities[0].name"))
    );
    assert_eq!(count(&db, "cities").await, 3);
    assert_eq!(engine.get_trip(alice, trip.id).await.unwrap().version, 1);
}

#[tokio::test]
async fn city_cap_holds_for_single_adds() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let mut draft = grand_tour();
    draft.cities = vec![CityDraft::new("Stop", "Nowhere"); 50];
    let trip = engine.create_trip(alice, &draft).await.unwrap();

    let err = engine
        .add_city(alice, trip.id, &CityDraft::new("One more", "Nowhere"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(ref e) if e.path == "cities"));
}

#[tokio::test]
async fn reorder_renumbers_in_the_given_order() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();
    let ids: Vec<Uuid> = trip.cities.iter().map(|city| city.id).collect();

    let reordered = engine
        .reorder_cities(alice, trip.id, &[ids[2], ids[0], ids[1]])
        .await
        .unwrap();

    assert_eq!(names(&reordered), vec!["Geneva", "Paris", "Lyon"]);
    assert_eq!(positions(&reordered), vec![1, 2, 3]);
    assert_eq!(reordered.cities[1].activities.len(), 2);
    assert_eq!(reordered.version, 2);
}

#[tokio::test]
async fn reorder_needs_every_city_exactly_once() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();
    let ids: Vec<Uuid> = trip.cities.iter().map(|city| city.id).collect();

    for attempt in [
        vec![ids[0], ids[1]],
        vec![ids[0], ids[0], ids[1]],
        vec![ids[0], ids[1], Uuid::new_v4()],
    ] {
        let err = engine
            .reorder_cities(alice, trip.id, &attempt)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(ref e) if e.path == "cities"));
    }

    let trip = engine.get_trip(alice, trip.id).await.unwrap();
    assert_eq!(names(&trip), vec!["Paris", "Lyon", "Geneva"]);
    assert_eq!(trip.version, 1);
}

#[tokio::test]
async fn deleting_a_city_closes_the_gap() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();
    let paris = trip.cities[0].id;

    engine.delete_city(alice, trip.id, paris).await.unwrap();

    let trip = engine.get_trip(alice, trip.id).await.unwrap();
    assert_eq!(names(&trip), vec!["Lyon", "Geneva"]);
    assert_eq!(positions(&trip), vec![1, 2]);
    assert_eq!(count(&db, "activities").await, 1);

    assert_eq!(
        engine.delete_city(alice, trip.id, paris).await.unwrap_err(),
        EngineError::KeyNotFound("city".to_string())
    );
}

#[tokio::test]
async fn city_of_another_trip_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let first = engine.create_trip(alice, &grand_tour()).await.unwrap();
    let second = engine.create_trip(alice, &grand_tour()).await.unwrap();

    assert_eq!(
        engine
            .delete_city(alice, second.id, first.cities[0].id)
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("city".to_string())
    );
    assert_eq!(engine.get_trip(alice, first.id).await.unwrap().cities.len(), 3);
}

#[tokio::test]
async fn activity_cost_update() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();
    let louvre = trip.cities[0].activities[0].id;

    let updated = engine
        .update_activity_cost(alice, louvre, Some("35.50"))
        .await
        .unwrap();
    assert_eq!(updated.cost, Money::new(3550));
    assert_eq!(updated.name, "Louvre");
    assert_eq!(updated.position, 1);

    let cleared = engine
        .update_activity_cost(alice, louvre, Some("free"))
        .await
        .unwrap();
    assert_eq!(cleared.cost, Money::ZERO);

    let err = engine
        .update_activity_cost(alice, louvre, Some("-2"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation(ValidationError::new("cost", "must not be negative"))
    );

    let trip = engine.get_trip(alice, trip.id).await.unwrap();
    assert_eq!(trip.cities[0].activities[0].cost, Money::ZERO);
    assert_eq!(trip.version, 3);
}

#[tokio::test]
async fn strangers_cannot_touch_the_itinerary() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let mallory = user(&engine, "mallory").await;
    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();
    let ids: Vec<Uuid> = trip.cities.iter().map(|city| city.id).collect();

    assert_eq!(
        engine
            .add_city(mallory, trip.id, &CityDraft::new("Milan", "Italy"))
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("trip".to_string())
    );
    assert_eq!(
        engine
            .reorder_cities(mallory, trip.id, &ids)
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("trip".to_string())
    );
    assert_eq!(
        engine
            .delete_city(mallory, trip.id, ids[0])
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("trip".to_string())
    );
    assert_eq!(
        engine
            .update_activity_cost(mallory, trip.cities[0].activities[0].id, Some("1"))
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("activity".to_string())
    );

    engine.delete_trip(alice, trip.id).await.unwrap();
    assert_eq!(
        engine
            .update_activity_cost(alice, trip.cities[0].activities[0].id, Some("1"))
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("activity".to_string())
    );
}
