//! Cities are the ordered stops of a trip.

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{Activity, Money, ResultEngine, activities::ActivityFields, util};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct City {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub name: String,
    pub country: String,
    pub state: Option<String>,
    /// 1-based, unique within the trip.
    pub position: i32,
    pub arrival_date: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub estimated_budget: Money,
    pub actual_spent: Money,
    /// Ordered by `position` ascending.
    pub activities: Vec<Activity>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub trip_id: String,
    pub name: String,
    pub country: String,
    pub state: Option<String>,
    pub position: i32,
    pub arrival_date: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub estimated_budget_minor: i64,
    pub actual_spent_minor: i64,
    pub created_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
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
    #[sea_orm(has_many = "super::activities::Entity")]
    Activities,
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl Related<super::activities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub(crate) fn into_city(self, activities: Vec<Activity>) -> ResultEngine<City> {
        Ok(City {
            id: util::parse_uuid(&self.id, "city")?,
            trip_id: util::parse_uuid(&self.trip_id, "trip")?,
            name: self.name,
            country: self.country,
            state: self.state,
            position: self.position,
            arrival_date: self.arrival_date,
            departure_date: self.departure_date,
            notes: self.notes,
            estimated_budget: Money::new(self.estimated_budget_minor),
            actual_spent: Money::new(self.actual_spent_minor),
            activities,
        })
    }
}

/// A validated city with its activities, in document order.
#[derive(Clone, Debug)]
pub(crate) struct CityFields {
    pub name: String,
    pub country: String,
    pub state: Option<String>,
    pub arrival_date: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub estimated_budget: Money,
    pub actual_spent: Money,
    pub activities: Vec<ActivityFields>,
}

impl ActiveModel {
    pub(crate) fn new_city(id: Uuid, trip_id: Uuid, position: i32, fields: &CityFields) -> Self {
        Self {
            id: ActiveValue::Set(id.to_string()),
            trip_id: ActiveValue::Set(trip_id.to_string()),
            name: ActiveValue::Set(fields.name.clone()),
            country: ActiveValue::Set(fields.country.clone()),
            state: ActiveValue::Set(fields.state.clone()),
            position: ActiveValue::Set(position),
            arrival_date: ActiveValue::Set(fields.arrival_date),
            departure_date: ActiveValue::Set(fields.departure_date),
            notes: ActiveValue::Set(fields.notes.clone()),
            estimated_budget_minor: ActiveValue::Set(fields.estimated_budget.minor()),
            actual_spent_minor: ActiveValue::Set(fields.actual_spent.minor()),
            created_at: ActiveValue::Set(util::now()),
            deleted_at: ActiveValue::Set(None),
        }
    }
}

impl From<&City> for CityFields {
    fn from(city: &City) -> Self {
        Self {
            name: city.name.clone(),
            country: city.country.clone(),
            state: city.state.clone(),
            arrival_date: city.arrival_date,
            departure_date: city.departure_date,
            notes: city.notes.clone(),
            estimated_budget: city.estimated_budget,
            actual_spent: city.actual_spent,
            activities: city.activities.iter().map(ActivityFields::from).collect(),
        }
    }
}
