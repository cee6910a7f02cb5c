//! Trip API endpoints

use api_types::trip::{Deleted, TripListResponse, TripNew, TripResponse, TripSaved, TripUpdate};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::User;

use crate::{
    ServerError,
    convert::{parse_id, trip_draft, trip_patch, trip_view},
    server::ServerState,
};

/// Create a trip with its cities and activities in one go.
pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<TripNew>, ServerError>,
) -> Result<(StatusCode, Json<TripSaved>), ServerError> {
    let trip = state
        .engine
        .create_trip(user.id, &trip_draft(payload))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TripSaved {
            success: true,
            trip: trip_view(&trip),
            message: "Trip created successfully".to_string(),
        }),
    ))
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<TripListResponse>, ServerError> {
    let trips = state.engine.list_trips(user.id).await?;
    Ok(Json(TripListResponse {
        trips: trips.iter().map(trip_view).collect(),
    }))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<TripResponse>, ServerError> {
    let trip_id = parse_id(&id, "trip")?;
    let trip = state.engine.get_trip(user.id, trip_id).await?;
    Ok(Json(TripResponse {
        trip: trip_view(&trip),
    }))
}

/// Apply a partial update. A `cities` array replaces the whole itinerary.
pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<TripUpdate>, ServerError>,
) -> Result<Json<TripSaved>, ServerError> {
    let trip_id = parse_id(&id, "trip")?;
    let trip = state
        .engine
        .update_trip(user.id, trip_id, &trip_patch(payload))
        .await?;

    Ok(Json(TripSaved {
        success: true,
        trip: trip_view(&trip),
        message: "Trip updated successfully".to_string(),
    }))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ServerError> {
    let trip_id = parse_id(&id, "trip")?;
    state.engine.delete_trip(user.id, trip_id).await?;
    Ok(Json(Deleted {
        success: true,
        message: "Trip deleted successfully".to_string(),
    }))
}
