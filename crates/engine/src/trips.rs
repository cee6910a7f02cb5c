//! A `Trip` is the root of an itinerary: ordered cities, each holding ordered
//! activities. Budget aggregates (`total_spent`, `category_breakdown`) are a
//! cache over the trip's budget items and are rewritten on every budget read
//! or write.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    BudgetCategory, City, Currency, Money, ResultEngine, TripStatus, TripType, util,
};

/// Per-category planned amount set by the owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomBudget {
    pub category: String,
    pub amount: Money,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trip {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_budget: Money,
    pub total_spent: Money,
    pub currency: Currency,
    pub status: TripStatus,
    pub trip_type: TripType,
    pub category_breakdown: BTreeMap<BudgetCategory, Money>,
    pub custom_budgets: Vec<CustomBudget>,
    pub tags: Vec<String>,
    pub share_token: Option<String>,
    pub is_public: bool,
    pub version: i32,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
    /// Ordered by `position` ascending.
    pub cities: Vec<City>,
}

impl Trip {
    /// Number of activities across all cities.
    pub fn activity_count(&self) -> usize {
        self.cities.iter().map(|city| city.activities.len()).sum()
    }

    pub fn remaining_budget(&self) -> Money {
        self.total_budget - self.total_spent
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_budget_minor: i64,
    pub total_spent_minor: i64,
    pub currency: String,
    pub status: String,
    pub trip_type: String,
    pub category_breakdown: String,
    pub custom_budgets: String,
    pub tags: String,
    #[sea_orm(unique)]
    pub share_token: Option<String>,
    pub is_public: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(has_many = "super::cities::Entity")]
    Cities,
    #[sea_orm(has_many = "super::budget_items::Entity")]
    BudgetItems,
    #[sea_orm(has_one = "super::sharing::Entity")]
    SharedTrip,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::cities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cities.def()
    }
}

impl Related<super::budget_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetItems.def()
    }
}

impl Related<super::sharing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SharedTrip.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Breakdown as stored in the `category_breakdown` JSON column.
pub(crate) fn encode_breakdown(
    breakdown: &BTreeMap<BudgetCategory, Money>,
) -> ResultEngine<String> {
    let raw: BTreeMap<&str, i64> = breakdown
        .iter()
        .map(|(category, amount)| (category.as_str(), amount.minor()))
        .collect();
    util::to_json_column(&raw, "category_breakdown")
}

pub(crate) fn decode_breakdown(raw: &str) -> ResultEngine<BTreeMap<BudgetCategory, Money>> {
    let raw: BTreeMap<String, i64> = util::from_json_column(raw, "category_breakdown")?;
    raw.into_iter()
        .map(|(category, minor)| {
            Ok((BudgetCategory::try_from(category.as_str())?, Money::new(minor)))
        })
        .collect()
}

impl Model {
    pub(crate) fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub(crate) fn stored_breakdown(&self) -> ResultEngine<BTreeMap<BudgetCategory, Money>> {
        decode_breakdown(&self.category_breakdown)
    }

    /// Maps the row and attaches an already loaded city tree.
    pub(crate) fn into_trip(self, cities: Vec<City>) -> ResultEngine<Trip> {
        let category_breakdown = self.stored_breakdown()?;
        Ok(Trip {
            id: util::parse_uuid(&self.id, "trip")?,
            owner_id: util::parse_uuid(&self.owner_id, "user")?,
            name: self.name,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            total_budget: Money::new(self.total_budget_minor),
            total_spent: Money::new(self.total_spent_minor),
            currency: util::model_currency(&self.currency)?,
            status: TripStatus::try_from(self.status.as_str())?,
            trip_type: TripType::try_from(self.trip_type.as_str())?,
            category_breakdown,
            custom_budgets: util::from_json_column(&self.custom_budgets, "custom_budgets")?,
            tags: util::from_json_column(&self.tags, "tags")?,
            share_token: self.share_token,
            is_public: self.is_public,
            version: self.version,
            created_at: util::to_utc(self.created_at),
            updated_at: util::to_utc(self.updated_at),
            cities,
        })
    }
}

/// Scalar fields of a trip about to be inserted.
#[derive(Clone, Debug)]
pub(crate) struct TripFields {
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_budget: Money,
    pub currency: Currency,
    pub trip_type: TripType,
    pub tags: Vec<String>,
    pub custom_budgets: Vec<CustomBudget>,
}

impl ActiveModel {
    pub(crate) fn new_trip(id: Uuid, owner_id: Uuid, fields: &TripFields) -> ResultEngine<Self> {
        let now = util::now();
        Ok(Self {
            id: ActiveValue::Set(id.to_string()),
            owner_id: ActiveValue::Set(owner_id.to_string()),
            name: ActiveValue::Set(fields.name.clone()),
            description: ActiveValue::Set(fields.description.clone()),
            start_date: ActiveValue::Set(fields.start_date),
            end_date: ActiveValue::Set(fields.end_date),
            total_budget_minor: ActiveValue::Set(fields.total_budget.minor()),
            total_spent_minor: ActiveValue::Set(0),
            currency: ActiveValue::Set(fields.currency.code().to_string()),
            status: ActiveValue::Set(TripStatus::default().as_str().to_string()),
            trip_type: ActiveValue::Set(fields.trip_type.as_str().to_string()),
            category_breakdown: ActiveValue::Set("{}".to_string()),
            custom_budgets: ActiveValue::Set(util::to_json_column(
                &fields.custom_budgets,
                "custom_budgets",
            )?),
            tags: ActiveValue::Set(util::to_json_column(&fields.tags, "tags")?),
            share_token: ActiveValue::Set(None),
            is_public: ActiveValue::Set(false),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(None),
            version: ActiveValue::Set(1),
        })
    }
}

impl From<&Trip> for TripFields {
    fn from(trip: &Trip) -> Self {
        Self {
            name: trip.name.clone(),
            description: trip.description.clone(),
            start_date: trip.start_date,
            end_date: trip.end_date,
            total_budget: trip.total_budget,
            currency: trip.currency,
            trip_type: trip.trip_type,
            tags: trip.tags.clone(),
            custom_budgets: trip.custom_budgets.clone(),
        }
    }
}
