//! Single-stop itinerary endpoints: cities of a trip and activity costs.

use api_types::trip::{
    ActivityCost, ActivityResponse, CityInput, CityOrder, CityResponse, Deleted, TripSaved,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::User;

use crate::{
    ServerError,
    convert::{activity_view, amount_text, city_draft, city_order, city_view, parse_id, trip_view},
    server::ServerState,
};

pub async fn add_city(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(trip_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<CityInput>, ServerError>,
) -> Result<(StatusCode, Json<CityResponse>), ServerError> {
    let trip_id = parse_id(&trip_id, "trip")?;
    let city = state
        .engine
        .add_city(user.id, trip_id, &city_draft(payload))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CityResponse {
            city: city_view(&city),
        }),
    ))
}

pub async fn reorder_cities(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(trip_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<CityOrder>, ServerError>,
) -> Result<Json<TripSaved>, ServerError> {
    let trip_id = parse_id(&trip_id, "trip")?;
    let trip = state
        .engine
        .reorder_cities(user.id, trip_id, &city_order(payload))
        .await?;

    Ok(Json(TripSaved {
        success: true,
        trip: trip_view(&trip),
        message: "City order updated successfully".to_string(),
    }))
}

pub async fn delete_city(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path((trip_id, city_id)): Path<(String, String)>,
) -> Result<Json<Deleted>, ServerError> {
    let trip_id = parse_id(&trip_id, "trip")?;
    let city_id = parse_id(&city_id, "city")?;
    state.engine.delete_city(user.id, trip_id, city_id).await?;
    Ok(Json(Deleted {
        success: true,
        message: "City deleted successfully".to_string(),
    }))
}

pub async fn update_activity_cost(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(activity_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<ActivityCost>, ServerError>,
) -> Result<Json<ActivityResponse>, ServerError> {
    let activity_id = parse_id(&activity_id, "activity")?;
    let cost = amount_text(payload.cost);
    let activity = state
        .engine
        .update_activity_cost(user.id, activity_id, cost.as_deref())
        .await?;
    Ok(Json(ActivityResponse {
        activity: activity_view(&activity),
    }))
}
