use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use std::sync::Arc;

use crate::{auth::auth, budget, health, itinerary, shared, trips};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// Prefix of the share links handed out by `POST /trips/{id}/share`.
    pub public_base_url: Arc<str>,
}

impl ServerState {
    pub fn new(engine: Arc<Engine>, public_base_url: &str) -> Self {
        Self {
            engine,
            public_base_url: Arc::from(public_base_url.trim_end_matches('/')),
        }
    }
}

fn public_routes() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health::get))
        .route("/trips/shared", get(shared::list))
        .route("/trips/shared/{token}", get(shared::resolve))
}

fn protected_routes(state: ServerState) -> Router<ServerState> {
    Router::new()
        .route("/trips", post(trips::create).get(trips::list))
        .route(
            "/trips/{id}",
            get(trips::get).put(trips::update).delete(trips::delete),
        )
        .route("/trips/{id}/share", post(shared::share))
        .route("/cities/trip/{trip_id}", post(itinerary::add_city))
        .route(
            "/cities/trip/{trip_id}/order",
            put(itinerary::reorder_cities),
        )
        .route(
            "/cities/trip/{trip_id}/{city_id}",
            delete(itinerary::delete_city),
        )
        .route("/activities/{id}", put(itinerary::update_activity_cost))
        .route("/trips/shared/{token}/copy", post(shared::copy))
        .route(
            "/trips/{id}/budget",
            post(budget::add_item).get(budget::list_items),
        )
        .route("/trips/{id}/budget/summary", get(budget::summary))
        .route("/budget/summaries", get(budget::summaries))
        .route(
            "/budget/{id}",
            put(budget::update_item).delete(budget::delete_item),
        )
        .route_layer(middleware::from_fn_with_state(state, auth))
}

/// The whole HTTP surface, ready to be served or driven in tests.
pub fn app(state: ServerState) -> Router {
    public_routes()
        .merge(protected_routes(state.clone()))
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
