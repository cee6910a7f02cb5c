//! Public share tokens. At most one `SharedTrip` exists per trip.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{ResultEngine, Trip, util};

/// Entropy of a freshly minted share token, in bytes.
pub(crate) const SHARE_TOKEN_BYTES: usize = 16;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharedTrip {
    pub trip: Trip,
    /// View count after this resolve.
    pub views: i64,
}

/// Entry of the public listing of shared trips.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharedTripCard {
    pub trip_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub author: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cities: Vec<String>,
    pub views: i64,
    pub share_token: String,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "shared_trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub trip_id: String,
    #[sea_orm(unique)]
    pub share_token: String,
    pub is_public: bool,
    pub views: i64,
    pub expires_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trips::Entity",
        from = "Column::TripId",
        to = "super::trips::Column::Id",
        on_delete = "Cascade"
    )]
    Trip,
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub(crate) fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    pub(crate) fn trip_uuid(&self) -> ResultEngine<Uuid> {
        util::parse_uuid(&self.trip_id, "trip")
    }
}

impl ActiveModel {
    pub(crate) fn new_share(
        trip_id: &str,
        expires_at: Option<chrono::DateTime<Utc>>,
    ) -> Self {
        Self {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            trip_id: ActiveValue::Set(trip_id.to_string()),
            share_token: ActiveValue::Set(util::random_token(SHARE_TOKEN_BYTES)),
            is_public: ActiveValue::Set(true),
            views: ActiveValue::Set(0),
            expires_at: ActiveValue::Set(expires_at.map(|at| at.naive_utc())),
            created_at: ActiveValue::Set(util::now()),
        }
    }
}
