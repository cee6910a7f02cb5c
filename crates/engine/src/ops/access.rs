//! Ownership-scoped lookups.
//!
//! A row that exists but belongs to someone else is reported exactly like a
//! missing row, so callers cannot discover ids they do not own.

use sea_orm::{ConnectionTrait, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, activities, budget_items, cities, trips};

use super::Engine;

fn trip_not_found() -> EngineError {
    EngineError::KeyNotFound("trip".to_string())
}

impl Engine {
    /// Live (not tombstoned) trip owned by `owner_id`.
    pub(super) async fn require_trip_owner<C: ConnectionTrait>(
        &self,
        db: &C,
        trip_id: Uuid,
        owner_id: Uuid,
    ) -> ResultEngine<trips::Model> {
        trips::Entity::find_by_id(trip_id.to_string())
            .filter(trips::Column::OwnerId.eq(owner_id.to_string()))
            .filter(trips::Column::DeletedAt.is_null())
            .one(db)
            .await?
            .ok_or_else(trip_not_found)
    }

    /// Tombstoned trip owned by `owner_id`.
    pub(super) async fn require_deleted_trip_owner<C: ConnectionTrait>(
        &self,
        db: &C,
        trip_id: Uuid,
        owner_id: Uuid,
    ) -> ResultEngine<trips::Model> {
        trips::Entity::find_by_id(trip_id.to_string())
            .filter(trips::Column::OwnerId.eq(owner_id.to_string()))
            .filter(trips::Column::DeletedAt.is_not_null())
            .one(db)
            .await?
            .ok_or_else(trip_not_found)
    }

    /// Budget item whose trip is live and owned by `owner_id`.
    pub(super) async fn require_budget_item_owner<C: ConnectionTrait>(
        &self,
        db: &C,
        item_id: Uuid,
        owner_id: Uuid,
    ) -> ResultEngine<(budget_items::Model, trips::Model)> {
        let not_found = || EngineError::KeyNotFound("budget item".to_string());
        let (item, trip) = budget_items::Entity::find_by_id(item_id.to_string())
            .find_also_related(trips::Entity)
            .one(db)
            .await?
            .ok_or_else(not_found)?;
        match trip {
            Some(trip) if trip.owner_id == owner_id.to_string() && !trip.is_deleted() => {
                Ok((item, trip))
            }
            _ => Err(not_found()),
        }
    }

    /// Live city belonging to the given (already owner-checked) trip.
    pub(super) async fn require_city_of_trip<C: ConnectionTrait>(
        &self,
        db: &C,
        trip: &trips::Model,
        city_id: Uuid,
    ) -> ResultEngine<cities::Model> {
        cities::Entity::find_by_id(city_id.to_string())
            .filter(cities::Column::TripId.eq(trip.id.clone()))
            .filter(cities::Column::DeletedAt.is_null())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("city".to_string()))
    }

    /// Live activity whose trip is live and owned by `owner_id`.
    pub(super) async fn require_activity_owner<C: ConnectionTrait>(
        &self,
        db: &C,
        activity_id: Uuid,
        owner_id: Uuid,
    ) -> ResultEngine<(activities::Model, trips::Model)> {
        let not_found = || EngineError::KeyNotFound("activity".to_string());
        let (activity, city) = activities::Entity::find_by_id(activity_id.to_string())
            .filter(activities::Column::DeletedAt.is_null())
            .find_also_related(cities::Entity)
            .one(db)
            .await?
            .ok_or_else(not_found)?;
        let city = city.ok_or_else(not_found)?;
        let trip = trips::Entity::find_by_id(city.trip_id)
            .filter(trips::Column::OwnerId.eq(owner_id.to_string()))
            .filter(trips::Column::DeletedAt.is_null())
            .one(db)
            .await?
            .ok_or_else(not_found)?;
        Ok((activity, trip))
    }
}
