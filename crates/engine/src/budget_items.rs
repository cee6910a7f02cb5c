//! Ad-hoc expenses attached directly to a trip, independent of the itinerary.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{BudgetCategory, Currency, Money, ResultEngine, util};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetItem {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: BudgetCategory,
    pub budgeted_amount: Money,
    pub actual_amount: Money,
    pub currency: Currency,
    pub date: Option<NaiveDate>,
    pub is_paid: bool,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "budget_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub trip_id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub budgeted_minor: i64,
    pub actual_minor: i64,
    pub currency: String,
    pub date: Option<NaiveDate>,
    pub is_paid: bool,
    pub notes: Option<String>,
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

impl TryFrom<Model> for BudgetItem {
    type Error = crate::EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: util::parse_uuid(&model.id, "budget item")?,
            trip_id: util::parse_uuid(&model.trip_id, "trip")?,
            category: BudgetCategory::try_from(model.category.as_str())?,
            currency: util::model_currency(&model.currency)?,
            name: model.name,
            description: model.description,
            budgeted_amount: Money::new(model.budgeted_minor),
            actual_amount: Money::new(model.actual_minor),
            date: model.date,
            is_paid: model.is_paid,
            notes: model.notes,
            created_at: util::to_utc(model.created_at),
        })
    }
}

impl From<&BudgetItem> for ActiveModel {
    fn from(item: &BudgetItem) -> Self {
        Self {
            id: ActiveValue::Set(item.id.to_string()),
            trip_id: ActiveValue::Set(item.trip_id.to_string()),
            name: ActiveValue::Set(item.name.clone()),
            description: ActiveValue::Set(item.description.clone()),
            category: ActiveValue::Set(item.category.as_str().to_string()),
            budgeted_minor: ActiveValue::Set(item.budgeted_amount.minor()),
            actual_minor: ActiveValue::Set(item.actual_amount.minor()),
            currency: ActiveValue::Set(item.currency.code().to_string()),
            date: ActiveValue::Set(item.date),
            is_paid: ActiveValue::Set(item.is_paid),
            notes: ActiveValue::Set(item.notes.clone()),
            created_at: ActiveValue::Set(item.created_at.naive_utc()),
        }
    }
}
