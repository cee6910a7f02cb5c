#![allow(dead_code)]

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{ActivityDraft, CityDraft, Engine, TripDraft};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub async fn user(engine: &Engine, username: &str) -> Uuid {
    engine.create_user(username, None).await.unwrap().0
}

pub async fn count(db: &DatabaseConnection, table: &str) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            format!("SELECT COUNT(*) AS n FROM {table}"),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

pub async fn exec(db: &DatabaseConnection, sql: &str) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_string(backend, sql.to_string()))
        .await
        .unwrap();
}

/// Three cities with two, one and zero activities.
pub fn grand_tour() -> TripDraft {
    TripDraft::new("Grand Tour", "2024-06-01", "2024-06-20")
        .total_budget("3000")
        .currency("EUR")
        .city(
            CityDraft::new("Paris", "France")
                .dates("2024-06-01", "2024-06-05")
                .activity(ActivityDraft::new("Louvre", "2024-06-02").cost("22"))
                .activity(ActivityDraft::new("Seine cruise", "2024-06-03")),
        )
        .city(
            CityDraft::new("Lyon", "France")
                .activity(ActivityDraft::new("Bouchon dinner", "2024-06-06").category("food")),
        )
        .city(CityDraft::new("Geneva", "Switzerland"))
}
