//! Sharing API endpoints. Resolving and listing are public.

use api_types::share::{ShareCreated, SharedTripResponse, SharedTripsResponse, TripCopied};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::User;

use crate::{
    ServerError,
    convert::{card_view, parse_id, trip_view},
    server::ServerState,
};

pub async fn share(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ShareCreated>, ServerError> {
    let trip_id = parse_id(&id, "trip")?;
    let token = state.engine.share_trip(user.id, trip_id).await?;
    Ok(Json(ShareCreated {
        share_url: format!("{}/shared/{token}", state.public_base_url),
        share_token: token,
    }))
}

pub async fn resolve(
    State(state): State<ServerState>,
    Path(token): Path<String>,
) -> Result<Json<SharedTripResponse>, ServerError> {
    let shared = state.engine.resolve_shared(&token).await?;
    Ok(Json(SharedTripResponse {
        trip: trip_view(&shared.trip),
        views: shared.views,
    }))
}

pub async fn copy(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(token): Path<String>,
) -> Result<(StatusCode, Json<TripCopied>), ServerError> {
    let trip = state.engine.copy_shared(user.id, &token).await?;
    Ok((
        StatusCode::CREATED,
        Json(TripCopied {
            trip: trip_view(&trip),
            message: "Trip copied successfully".to_string(),
        }),
    ))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<SharedTripsResponse>, ServerError> {
    let cards = state.engine.list_shared().await?;
    Ok(Json(SharedTripsResponse {
        trips: cards.into_iter().map(card_view).collect(),
    }))
}
