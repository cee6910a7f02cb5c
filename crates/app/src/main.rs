use std::{sync::Arc, time::Duration};

use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "itinera={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let Some(server) = settings.server else {
        tracing::warn!("no [server] settings found, nothing to run");
        return Ok(());
    };

    tracing::info!("Found server settings...");
    let db = parse_database(&server.database).await?;
    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await?;

    let mut tasks = tokio::task::JoinSet::new();
    tasks.spawn(liveness(db, Duration::from_secs(server.liveness_interval_secs.max(1))));

    let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, server.port);
    let public_base_url = server
        .public_base_url
        .unwrap_or_else(|| format!("http://localhost:{}", server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let state = server::ServerState::new(Arc::new(engine), &public_base_url);
    tasks.spawn(async move {
        if let Err(err) = server::run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

/// Periodic round trip to the store. Failures are only logged.
async fn liveness(db: DatabaseConnection, every: Duration) {
    let mut interval = tokio::time::interval(every);
    loop {
        interval.tick().await;
        match db.ping().await {
            Ok(()) => tracing::debug!("database liveness ok"),
            Err(err) => tracing::error!("database liveness check failed: {err}"),
        }
    }
}

async fn parse_database(
    config: &settings::Database,
) -> Result<DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
