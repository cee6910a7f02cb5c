mod common;

use common::{count, engine_with_db, exec, grand_tour, user};
use engine::{BudgetItemDraft, EngineError, TripDraft, TripStatus};

#[tokio::test]
async fn share_is_idempotent() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();

    let first = engine.share_trip(alice, trip.id).await.unwrap();
    let second = engine.share_trip(alice, trip.id).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 32);
    assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(count(&db, "shared_trips").await, 1);

    let trip = engine.get_trip(alice, trip.id).await.unwrap();
    assert_eq!(trip.share_token.as_deref(), Some(first.as_str()));
    assert!(trip.is_public);
}

#[tokio::test]
async fn sharing_a_foreign_trip_is_not_found() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let mallory = user(&engine, "mallory").await;
    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();

    assert_eq!(
        engine.share_trip(mallory, trip.id).await.unwrap_err(),
        EngineError::KeyNotFound("trip".to_string())
    );
    assert_eq!(count(&db, "shared_trips").await, 0);
}

#[tokio::test]
async fn resolve_counts_views_and_returns_the_tree() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();
    let token = engine.share_trip(alice, trip.id).await.unwrap();

    let first = engine.resolve_shared(&token).await.unwrap();
    let second = engine.resolve_shared(&token).await.unwrap();

    assert_eq!(first.views, 1);
    assert_eq!(second.views, 2);
    assert_eq!(second.trip.id, trip.id);
    let positions: Vec<i32> = second.trip.cities.iter().map(|c| c.position).collect();
    assert_eq!(positions, vec![1, 2, 3]);
}

#[tokio::test]
async fn unknown_token_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    assert_eq!(
        engine.resolve_shared("deadbeef").await.unwrap_err(),
        EngineError::KeyNotFound("shared trip".to_string())
    );
}

#[tokio::test]
async fn expired_or_private_shares_are_not_found() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();
    let token = engine.share_trip(alice, trip.id).await.unwrap();

    exec(
        &db,
        "UPDATE shared_trips SET expires_at = '2000-01-01 00:00:00'",
    )
    .await;
    assert!(matches!(
        engine.resolve_shared(&token).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(engine.list_shared().await.unwrap().is_empty());

    exec(
        &db,
        "UPDATE shared_trips SET expires_at = NULL, is_public = 0",
    )
    .await;
    assert!(matches!(
        engine.resolve_shared(&token).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn deleted_trip_is_no_longer_shared() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();
    let token = engine.share_trip(alice, trip.id).await.unwrap();

    engine.delete_trip(alice, trip.id).await.unwrap();
    assert!(matches!(
        engine.resolve_shared(&token).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(engine.list_shared().await.unwrap().is_empty());
}

#[tokio::test]
async fn copy_clones_the_itinerary_only() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;

    let mut draft = grand_tour();
    draft.cities[0].activities[0].is_booked = Some(true);
    draft.cities[0].activities[0].booking_reference = Some("LV-123".to_string());
    let trip = engine.create_trip(alice, &draft).await.unwrap();
    engine
        .add_budget_item(alice, trip.id, &BudgetItemDraft::new("food", "40"))
        .await
        .unwrap();
    let token = engine.share_trip(alice, trip.id).await.unwrap();

    let copy = engine.copy_shared(bob, &token).await.unwrap();

    assert_ne!(copy.id, trip.id);
    assert_eq!(copy.owner_id, bob);
    assert_eq!(copy.name, "Grand Tour (Copy)");
    assert_eq!(copy.status, TripStatus::Planning);
    assert_eq!(copy.total_budget, trip.total_budget);
    assert_eq!(copy.total_spent, engine::Money::ZERO);
    assert_eq!(copy.share_token, None);
    assert!(!copy.is_public);
    assert_eq!(copy.cities.len(), 3);
    assert_eq!(copy.activity_count(), 3);
    let louvre = &copy.cities[0].activities[0];
    assert!(!louvre.is_booked);
    assert_eq!(louvre.booking_reference, None);

    let (items, _) = engine.list_budget_items(bob, copy.id).await.unwrap();
    assert!(items.is_empty());
    assert_eq!(count(&db, "shared_trips").await, 1);
    assert_eq!(engine.resolve_shared(&token).await.unwrap().views, 1);
}

#[tokio::test]
async fn listing_orders_by_views_with_authors_and_cities() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;

    let quiet = engine.create_trip(alice, &grand_tour()).await.unwrap();
    let popular = engine
        .create_trip(
            bob,
            &engine::TripDraft::new("Rome weekend", "2024-05-03", "2024-05-05")
                .city(engine::CityDraft::new("Rome", "Italy")),
        )
        .await
        .unwrap();
    engine.share_trip(alice, quiet.id).await.unwrap();
    let popular_token = engine.share_trip(bob, popular.id).await.unwrap();
    engine.resolve_shared(&popular_token).await.unwrap();
    engine.resolve_shared(&popular_token).await.unwrap();

    let cards = engine.list_shared().await.unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].trip_id, popular.id);
    assert_eq!(cards[0].author, "bob");
    assert_eq!(cards[0].views, 2);
    assert_eq!(cards[0].cities, vec!["Rome".to_string()]);
    assert_eq!(cards[1].author, "alice");
    assert_eq!(cards[1].cities, vec!["Paris", "Lyon", "Geneva"]);
}

#[tokio::test]
async fn copy_of_a_maximal_name_stays_within_bounds() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;
    let long_name = "x".repeat(200);
    let trip = engine
        .create_trip(alice, &TripDraft::new(&long_name, "2024-06-01", "2024-06-10"))
        .await
        .unwrap();
    let token = engine.share_trip(alice, trip.id).await.unwrap();

    let copy = engine.copy_shared(bob, &token).await.unwrap();
    assert_eq!(copy.name.chars().count(), 200);
    assert!(copy.name.ends_with(" (Copy)"));
    assert!(copy.name.starts_with(&"x".repeat(193)));

    let again = engine.copy_shared(bob, &token).await.unwrap();
    assert_eq!(again.name, copy.name);
}

#[tokio::test]
async fn concurrent_resolves_report_distinct_counts() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let trip = engine.create_trip(alice, &grand_tour()).await.unwrap();
    let token = engine.share_trip(alice, trip.id).await.unwrap();
    exec(&db, "UPDATE shared_trips SET views = 40").await;

    let (first, second) = tokio::join!(
        engine.resolve_shared(&token),
        engine.resolve_shared(&token)
    );
    let mut views = vec![first.unwrap().views, second.unwrap().views];
    views.sort_unstable();
    assert_eq!(views, vec![41, 42]);
}
