//! Trip Composer: a trip and its whole city/activity tree are always written
//! as one unit.

use std::collections::HashMap;

use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Activity, City, CityDraft, EngineError, ResultEngine, Trip, TripDraft, TripPatch,
    ValidationError, activities, cities, cities::CityFields, trips, util, validate,
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a trip with its ordered cities and activities.
    ///
    /// Positions follow document order (`index + 1`), whatever the caller
    /// sent. Nothing is persisted unless every level validates.
    pub async fn create_trip(&self, owner_id: Uuid, draft: &TripDraft) -> ResultEngine<Trip> {
        let new_trip = validate::new_trip(draft)?;
        let trip_id = Uuid::new_v4();

        with_tx!(self, |db_tx| {
            trips::ActiveModel::new_trip(trip_id, owner_id, &new_trip.fields)?
                .insert(&db_tx)
                .await?;
            insert_tree(&db_tx, trip_id, &new_trip.cities).await?;
            Ok::<_, EngineError>(())
        })?;

        tracing::info!(
            "trip {trip_id} created with {} cities",
            new_trip.cities.len()
        );
        self.get_trip(owner_id, trip_id).await
    }

    /// Live trips of the owner, newest first.
    pub async fn list_trips(&self, owner_id: Uuid) -> ResultEngine<Vec<Trip>> {
        let models = trips::Entity::find()
            .filter(trips::Column::OwnerId.eq(owner_id.to_string()))
            .filter(trips::Column::DeletedAt.is_null())
            .order_by_desc(trips::Column::CreatedAt)
            .order_by_desc(trips::Column::Id)
            .all(&self.database)
            .await?;
        load_trees(&self.database, models).await
    }

    pub async fn get_trip(&self, owner_id: Uuid, trip_id: Uuid) -> ResultEngine<Trip> {
        let model = self
            .require_trip_owner(&self.database, trip_id, owner_id)
            .await?;
        load_tree(&self.database, model).await
    }

    /// Apply a patch to a trip.
    ///
    /// When the patch carries `cities`, every existing city and activity of
    /// the trip is deleted and the new tree is inserted in its place. The
    /// trip `version` is bumped on every update; a stale `expected_version`
    /// fails with [`EngineError::VersionConflict`].
    pub async fn update_trip(
        &self,
        owner_id: Uuid,
        trip_id: Uuid,
        patch: &TripPatch,
    ) -> ResultEngine<Trip> {
        let changes = validate::trip_changes(patch)?;

        with_tx!(self, |db_tx| {
            let model = self.require_trip_owner(&db_tx, trip_id, owner_id).await?;
            if let Some(expected) = patch.expected_version
                && expected != model.version
            {
                return Err(EngineError::VersionConflict(format!(
                    "trip is at version {}, not {expected}",
                    model.version
                )));
            }
            if changes.start_date.is_some() || changes.end_date.is_some() {
                validate::date_range(
                    changes.start_date.unwrap_or(model.start_date),
                    changes.end_date.unwrap_or(model.end_date),
                )?;
            }

            let mut active = trips::ActiveModel {
                version: ActiveValue::Set(model.version + 1),
                updated_at: ActiveValue::Set(util::now()),
                ..Default::default()
            };
            if let Some(name) = &changes.name {
                active.name = ActiveValue::Set(name.clone());
            }
            if let Some(description) = &changes.description {
                active.description = ActiveValue::Set(description.clone());
            }
            if let Some(start_date) = changes.start_date {
                active.start_date = ActiveValue::Set(start_date);
            }
            if let Some(end_date) = changes.end_date {
                active.end_date = ActiveValue::Set(end_date);
            }
            if let Some(total_budget) = changes.total_budget {
                active.total_budget_minor = ActiveValue::Set(total_budget.minor());
            }
            if let Some(currency) = changes.currency {
                active.currency = ActiveValue::Set(currency.code().to_string());
            }
            if let Some(status) = changes.status {
                active.status = ActiveValue::Set(status.as_str().to_string());
            }
            if let Some(trip_type) = changes.trip_type {
                active.trip_type = ActiveValue::Set(trip_type.as_str().to_string());
            }
            if let Some(tags) = &changes.tags {
                active.tags = ActiveValue::Set(util::to_json_column(tags, "tags")?);
            }
            if let Some(custom_budgets) = &changes.custom_budgets {
                active.custom_budgets =
                    ActiveValue::Set(util::to_json_column(custom_budgets, "custom_budgets")?);
            }

            // Conditional on the version read above, so a concurrent writer
            // that committed in between makes this a no-op.
            let updated = trips::Entity::update_many()
                .set(active)
                .filter(trips::Column::Id.eq(model.id.clone()))
                .filter(trips::Column::Version.eq(model.version))
                .exec(&db_tx)
                .await?;
            if updated.rows_affected == 0 {
                return Err(EngineError::VersionConflict(
                    "trip was modified concurrently".to_string(),
                ));
            }

            if let Some(new_cities) = &changes.cities {
                delete_tree(&db_tx, &model.id).await?;
                insert_tree(&db_tx, trip_id, new_cities).await?;
            }
            Ok::<_, EngineError>(())
        })?;

        tracing::info!("trip {trip_id} updated");
        self.get_trip(owner_id, trip_id).await
    }

    /// Tombstone the trip, its cities and their activities.
    pub async fn delete_trip(&self, owner_id: Uuid, trip_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_trip_owner(&db_tx, trip_id, owner_id).await?;
            set_tombstone(&db_tx, &model.id, Some(util::now())).await?;
            Ok::<_, EngineError>(())
        })?;
        tracing::info!("trip {trip_id} deleted");
        Ok(())
    }

    /// Bring back a tombstoned trip with its whole tree.
    pub async fn restore_trip(&self, owner_id: Uuid, trip_id: Uuid) -> ResultEngine<Trip> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_deleted_trip_owner(&db_tx, trip_id, owner_id)
                .await?;
            set_tombstone(&db_tx, &model.id, None).await?;
            Ok::<_, EngineError>(())
        })?;
        tracing::info!("trip {trip_id} restored");
        self.get_trip(owner_id, trip_id).await
    }
}

/// Maintenance of a single stop: add, reorder and remove cities, reprice
/// activities. Positions stay `1..=n` after each of them.
impl Engine {
    /// Append a city, with its activities, after the last city of the trip.
    pub async fn add_city(
        &self,
        owner_id: Uuid,
        trip_id: Uuid,
        draft: &CityDraft,
    ) -> ResultEngine<City> {
        let fields = validate::new_city(draft)?;

        let city_id = with_tx!(self, |db_tx| {
            let trip = self.require_trip_owner(&db_tx, trip_id, owner_id).await?;
            let existing = ordered_city_ids(&db_tx, &trip.id).await?;
            if existing.len() >= validate::MAX_CITIES {
                return Err(ValidationError::new(
                    "cities",
                    format!("at most {} cities per trip", validate::MAX_CITIES),
                )
                .into());
            }
            let city_id = insert_city(&db_tx, trip_id, position(existing.len()), &fields).await?;
            bump_version(&db_tx, &trip.id).await?;
            Ok::<_, EngineError>(city_id)
        })?;

        tracing::info!("city {city_id} added to trip {trip_id}");
        self.get_trip(owner_id, trip_id)
            .await?
            .cities
            .into_iter()
            .find(|city| city.id == city_id)
            .ok_or_else(|| EngineError::KeyNotFound("city".to_string()))
    }

    /// Renumber the cities `1..=n` in the order of `city_ids`, which must
    /// name every city of the trip exactly once.
    pub async fn reorder_cities(
        &self,
        owner_id: Uuid,
        trip_id: Uuid,
        city_ids: &[Uuid],
    ) -> ResultEngine<Trip> {
        let wanted: Vec<String> = city_ids.iter().map(Uuid::to_string).collect();

        with_tx!(self, |db_tx| {
            let trip = self.require_trip_owner(&db_tx, trip_id, owner_id).await?;
            let mut current = ordered_city_ids(&db_tx, &trip.id).await?;
            let mut requested = wanted.clone();
            current.sort_unstable();
            requested.sort_unstable();
            if current != requested {
                return Err(ValidationError::new(
                    "cities",
                    "must list every city of the trip exactly once",
                )
                .into());
            }
            renumber_cities(&db_tx, &wanted).await?;
            bump_version(&db_tx, &trip.id).await?;
            Ok::<_, EngineError>(())
        })?;

        tracing::info!("cities of trip {trip_id} reordered");
        self.get_trip(owner_id, trip_id).await
    }

    /// Remove a city and its activities. Later cities move up one position.
    pub async fn delete_city(
        &self,
        owner_id: Uuid,
        trip_id: Uuid,
        city_id: Uuid,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let trip = self.require_trip_owner(&db_tx, trip_id, owner_id).await?;
            let city = self.require_city_of_trip(&db_tx, &trip, city_id).await?;
            activities::Entity::delete_many()
                .filter(activities::Column::CityId.eq(city.id.clone()))
                .exec(&db_tx)
                .await?;
            cities::Entity::delete_by_id(city.id).exec(&db_tx).await?;
            let remaining = ordered_city_ids(&db_tx, &trip.id).await?;
            renumber_cities(&db_tx, &remaining).await?;
            bump_version(&db_tx, &trip.id).await?;
            Ok::<_, EngineError>(())
        })?;

        tracing::info!("city {city_id} removed from trip {trip_id}");
        Ok(())
    }

    /// Set the cost of one activity. Parsed like every trip amount.
    pub async fn update_activity_cost(
        &self,
        owner_id: Uuid,
        activity_id: Uuid,
        cost: Option<&str>,
    ) -> ResultEngine<Activity> {
        let cost = validate::activity_cost(cost)?;

        let model = with_tx!(self, |db_tx| {
            let (activity, trip) = self
                .require_activity_owner(&db_tx, activity_id, owner_id)
                .await?;
            let updated = activities::ActiveModel {
                id: ActiveValue::Unchanged(activity.id),
                cost_minor: ActiveValue::Set(cost.minor()),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            bump_version(&db_tx, &trip.id).await?;
            Ok::<_, EngineError>(updated)
        })?;

        tracing::info!("activity {activity_id} cost set to {cost}");
        Activity::try_from(model)
    }
}

fn position(index: usize) -> i32 {
    i32::try_from(index + 1).unwrap_or(i32::MAX)
}

/// Insert cities and activities with positions taken from their index.
pub(super) async fn insert_tree<C: ConnectionTrait>(
    db: &C,
    trip_id: Uuid,
    new_cities: &[CityFields],
) -> ResultEngine<()> {
    for (index, city) in new_cities.iter().enumerate() {
        insert_city(db, trip_id, position(index), city).await?;
    }
    Ok(())
}

async fn insert_city<C: ConnectionTrait>(
    db: &C,
    trip_id: Uuid,
    at: i32,
    city: &CityFields,
) -> ResultEngine<Uuid> {
    let city_id = Uuid::new_v4();
    cities::ActiveModel::new_city(city_id, trip_id, at, city)
        .insert(db)
        .await?;
    for (index, activity) in city.activities.iter().enumerate() {
        activities::ActiveModel::new_activity(city_id, position(index), activity)
            .insert(db)
            .await?;
    }
    Ok(city_id)
}

/// Live cities of the trip, by position.
async fn ordered_city_ids<C: ConnectionTrait>(db: &C, trip_id: &str) -> ResultEngine<Vec<String>> {
    Ok(cities::Entity::find()
        .filter(cities::Column::TripId.eq(trip_id.to_string()))
        .filter(cities::Column::DeletedAt.is_null())
        .order_by_asc(cities::Column::Position)
        .all(db)
        .await?
        .into_iter()
        .map(|city| city.id)
        .collect())
}

/// Give `ordered` the positions `1..=n`.
///
/// Goes through negative positions first: the `(trip_id, position)` index is
/// unique, so two cities cannot swap in place.
async fn renumber_cities<C: ConnectionTrait>(db: &C, ordered: &[String]) -> ResultEngine<()> {
    for (index, city_id) in ordered.iter().enumerate() {
        set_city_position(db, city_id, -position(index)).await?;
    }
    for (index, city_id) in ordered.iter().enumerate() {
        set_city_position(db, city_id, position(index)).await?;
    }
    Ok(())
}

async fn set_city_position<C: ConnectionTrait>(
    db: &C,
    city_id: &str,
    at: i32,
) -> ResultEngine<()> {
    cities::Entity::update_many()
        .col_expr(cities::Column::Position, Expr::value(at))
        .filter(cities::Column::Id.eq(city_id.to_string()))
        .exec(db)
        .await?;
    Ok(())
}

/// Any change to the city/activity tree is a new trip version.
async fn bump_version<C: ConnectionTrait>(db: &C, trip_id: &str) -> ResultEngine<()> {
    trips::Entity::update_many()
        .col_expr(
            trips::Column::Version,
            Expr::col(trips::Column::Version).add(1),
        )
        .col_expr(trips::Column::UpdatedAt, Expr::value(util::now()))
        .filter(trips::Column::Id.eq(trip_id.to_string()))
        .exec(db)
        .await?;
    Ok(())
}

/// Hard delete every city of the trip, activities first.
async fn delete_tree<C: ConnectionTrait>(db: &C, trip_id: &str) -> ResultEngine<()> {
    let city_ids = city_ids(db, trip_id).await?;
    if !city_ids.is_empty() {
        activities::Entity::delete_many()
            .filter(activities::Column::CityId.is_in(city_ids))
            .exec(db)
            .await?;
    }
    cities::Entity::delete_many()
        .filter(cities::Column::TripId.eq(trip_id.to_string()))
        .exec(db)
        .await?;
    Ok(())
}

async fn city_ids<C: ConnectionTrait>(db: &C, trip_id: &str) -> ResultEngine<Vec<String>> {
    Ok(cities::Entity::find()
        .filter(cities::Column::TripId.eq(trip_id.to_string()))
        .all(db)
        .await?
        .into_iter()
        .map(|city| city.id)
        .collect())
}

/// Set (or clear, with `None`) `deleted_at` on the trip and its whole tree.
async fn set_tombstone<C: ConnectionTrait>(
    db: &C,
    trip_id: &str,
    deleted_at: Option<chrono::NaiveDateTime>,
) -> ResultEngine<()> {
    let city_ids = city_ids(db, trip_id).await?;
    if !city_ids.is_empty() {
        activities::Entity::update_many()
            .col_expr(activities::Column::DeletedAt, Expr::value(deleted_at))
            .filter(activities::Column::CityId.is_in(city_ids))
            .exec(db)
            .await?;
    }
    cities::Entity::update_many()
        .col_expr(cities::Column::DeletedAt, Expr::value(deleted_at))
        .filter(cities::Column::TripId.eq(trip_id.to_string()))
        .exec(db)
        .await?;
    trips::Entity::update_many()
        .col_expr(trips::Column::DeletedAt, Expr::value(deleted_at))
        .col_expr(trips::Column::UpdatedAt, Expr::value(util::now()))
        .filter(trips::Column::Id.eq(trip_id.to_string()))
        .exec(db)
        .await?;
    Ok(())
}

pub(super) async fn load_tree<C: ConnectionTrait>(
    db: &C,
    model: trips::Model,
) -> ResultEngine<Trip> {
    let mut loaded = load_trees(db, vec![model]).await?;
    loaded
        .pop()
        .ok_or_else(|| EngineError::KeyNotFound("trip".to_string()))
}

/// Materialize trips with their live cities and activities, both ordered by
/// position. Three queries regardless of the number of trips.
pub(super) async fn load_trees<C: ConnectionTrait>(
    db: &C,
    models: Vec<trips::Model>,
) -> ResultEngine<Vec<Trip>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let trip_ids: Vec<String> = models.iter().map(|model| model.id.clone()).collect();
    let city_models = cities::Entity::find()
        .filter(cities::Column::TripId.is_in(trip_ids))
        .filter(cities::Column::DeletedAt.is_null())
        .order_by_asc(cities::Column::Position)
        .all(db)
        .await?;

    let city_ids: Vec<String> = city_models.iter().map(|city| city.id.clone()).collect();
    let activity_models = if city_ids.is_empty() {
        Vec::new()
    } else {
        activities::Entity::find()
            .filter(activities::Column::CityId.is_in(city_ids))
            .filter(activities::Column::DeletedAt.is_null())
            .order_by_asc(activities::Column::Position)
            .all(db)
            .await?
    };

    let mut activities_by_city: HashMap<String, Vec<Activity>> = HashMap::new();
    for model in activity_models {
        activities_by_city
            .entry(model.city_id.clone())
            .or_default()
            .push(Activity::try_from(model)?);
    }

    let mut cities_by_trip: HashMap<String, Vec<City>> = HashMap::new();
    for model in city_models {
        let activities = activities_by_city.remove(&model.id).unwrap_or_default();
        let trip_id = model.trip_id.clone();
        cities_by_trip
            .entry(trip_id)
            .or_default()
            .push(model.into_city(activities)?);
    }

    models
        .into_iter()
        .map(|model| {
            let cities = cities_by_trip.remove(&model.id).unwrap_or_default();
            model.into_trip(cities)
        })
        .collect()
}
