//! Sharing Gateway.

use std::collections::HashMap;

use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, SharedTrip, SharedTripCard, Trip, cities, cities::CityFields,
    sharing, trips, trips::TripFields, users, util, validate::MAX_TRIP_NAME,
};

use super::{
    Engine,
    itinerary::{insert_tree, load_tree},
    with_tx,
};

const COPY_SUFFIX: &str = " (Copy)";

/// `"<name> (Copy)"`, shortening the name so the result stays a valid trip name.
fn copy_name(name: &str) -> String {
    let keep = MAX_TRIP_NAME - COPY_SUFFIX.chars().count();
    let base: String = name.chars().take(keep).collect();
    format!("{}{COPY_SUFFIX}", base.trim_end())
}

fn shared_not_found() -> EngineError {
    EngineError::KeyNotFound("shared trip".to_string())
}

/// Public, unexpired share whose trip is still live.
async fn live_share<C: ConnectionTrait>(
    db: &C,
    token: &str,
) -> ResultEngine<(sharing::Model, trips::Model)> {
    let (share, trip) = sharing::Entity::find()
        .filter(sharing::Column::ShareToken.eq(token.to_string()))
        .filter(sharing::Column::IsPublic.eq(true))
        .find_also_related(trips::Entity)
        .one(db)
        .await?
        .ok_or_else(shared_not_found)?;
    if share.is_expired(util::now()) {
        return Err(shared_not_found());
    }
    match trip {
        Some(trip) if !trip.is_deleted() => Ok((share, trip)),
        _ => Err(shared_not_found()),
    }
}

impl Engine {
    /// Return the trip's share token, minting one on first call.
    pub async fn share_trip(&self, owner_id: Uuid, trip_id: Uuid) -> ResultEngine<String> {
        with_tx!(self, |db_tx| {
            let trip = self.require_trip_owner(&db_tx, trip_id, owner_id).await?;
            if let Some(existing) = sharing::Entity::find()
                .filter(sharing::Column::TripId.eq(trip.id.clone()))
                .one(&db_tx)
                .await?
            {
                return Ok(existing.share_token);
            }

            let share = sharing::ActiveModel::new_share(&trip.id, None)
                .insert(&db_tx)
                .await?;
            trips::ActiveModel {
                id: ActiveValue::Unchanged(trip.id.clone()),
                share_token: ActiveValue::Set(Some(share.share_token.clone())),
                is_public: ActiveValue::Set(true),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            tracing::info!("trip {trip_id} shared");
            Ok(share.share_token)
        })
    }

    /// Public read of a shared trip. Every successful call counts one view.
    pub async fn resolve_shared(&self, token: &str) -> ResultEngine<SharedTrip> {
        with_tx!(self, |db_tx| {
            let (share, trip) = live_share(&db_tx, token).await?;
            sharing::Entity::update_many()
                .col_expr(
                    sharing::Column::Views,
                    Expr::col(sharing::Column::Views).add(1),
                )
                .filter(sharing::Column::Id.eq(share.id.clone()))
                .exec(&db_tx)
                .await?;
            // Read back inside the transaction: the count includes concurrent views.
            let views = sharing::Entity::find_by_id(share.id)
                .one(&db_tx)
                .await?
                .ok_or_else(shared_not_found)?
                .views;
            let trip = load_tree(&db_tx, trip).await?;
            Ok(SharedTrip { trip, views })
        })
    }

    /// Clone a shared trip into `owner_id`'s account, named `"<name> (Copy)"`.
    ///
    /// Only the itinerary is copied: budget items, sharing state and
    /// bookings stay with the original. Views are not counted.
    pub async fn copy_shared(&self, owner_id: Uuid, token: &str) -> ResultEngine<Trip> {
        let new_id = Uuid::new_v4();
        with_tx!(self, |db_tx| {
            let (_, trip) = live_share(&db_tx, token).await?;
            let original = load_tree(&db_tx, trip).await?;

            let mut fields = TripFields::from(&original);
            fields.name = copy_name(&original.name);
            let cities: Vec<CityFields> = original
                .cities
                .iter()
                .map(|city| {
                    let mut city = CityFields::from(city);
                    for activity in &mut city.activities {
                        activity.is_booked = false;
                        activity.booking_reference = None;
                    }
                    city
                })
                .collect();

            trips::ActiveModel::new_trip(new_id, owner_id, &fields)?
                .insert(&db_tx)
                .await?;
            insert_tree(&db_tx, new_id, &cities).await?;
            tracing::info!("trip {} copied into {new_id}", original.id);
            Ok::<_, EngineError>(())
        })?;
        self.get_trip(owner_id, new_id).await
    }

    /// Public listing: live, unexpired shares, most viewed first.
    pub async fn list_shared(&self) -> ResultEngine<Vec<SharedTripCard>> {
        let rows = sharing::Entity::find()
            .filter(sharing::Column::IsPublic.eq(true))
            .find_also_related(trips::Entity)
            .order_by_desc(sharing::Column::Views)
            .order_by_asc(sharing::Column::CreatedAt)
            .all(&self.database)
            .await?;

        let now = util::now();
        let rows: Vec<(sharing::Model, trips::Model)> = rows
            .into_iter()
            .filter_map(|(share, trip)| trip.map(|trip| (share, trip)))
            .filter(|(share, trip)| !share.is_expired(now) && !trip.is_deleted())
            .collect();
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let owner_ids: Vec<String> = rows.iter().map(|(_, trip)| trip.owner_id.clone()).collect();
        let authors: HashMap<String, String> = users::Entity::find()
            .filter(users::Column::Id.is_in(owner_ids))
            .all(&self.database)
            .await?
            .into_iter()
            .map(|user| (user.id, user.username))
            .collect();

        let trip_ids: Vec<String> = rows.iter().map(|(_, trip)| trip.id.clone()).collect();
        let mut city_names: HashMap<String, Vec<String>> = HashMap::new();
        for city in cities::Entity::find()
            .filter(cities::Column::TripId.is_in(trip_ids))
            .filter(cities::Column::DeletedAt.is_null())
            .order_by_asc(cities::Column::Position)
            .all(&self.database)
            .await?
        {
            city_names.entry(city.trip_id).or_default().push(city.name);
        }

        rows.into_iter()
            .map(|(share, trip)| {
                Ok(SharedTripCard {
                    trip_id: share.trip_uuid()?,
                    author: authors.get(&trip.owner_id).cloned().unwrap_or_default(),
                    cities: city_names.remove(&trip.id).unwrap_or_default(),
                    name: trip.name,
                    description: trip.description,
                    start_date: trip.start_date,
                    end_date: trip.end_date,
                    views: share.views,
                    share_token: share.share_token,
                })
            })
            .collect()
    }
}
