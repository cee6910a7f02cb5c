use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{ActivityCategory, Money, Priority, ResultEngine, util};

/// A dated, costed event inside a city.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Activity {
    pub id: Uuid,
    pub city_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: ActivityCategory,
    pub cost: Money,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub duration_minutes: Option<i32>,
    /// 1-based, unique within the city.
    pub position: i32,
    pub location: Option<String>,
    pub priority: Priority,
    pub is_booked: bool,
    pub booking_reference: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub city_id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub cost_minor: i64,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub duration_minutes: Option<i32>,
    pub position: i32,
    pub location: Option<String>,
    pub priority: String,
    pub is_booked: bool,
    pub booking_reference: Option<String>,
    pub created_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cities::Entity",
        from = "Column::CityId",
        to = "super::cities::Column::Id",
        on_delete = "Cascade"
    )]
    City,
}

impl Related<super::cities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::City.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Activity {
    type Error = crate::EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: util::parse_uuid(&model.id, "activity")?,
            city_id: util::parse_uuid(&model.city_id, "city")?,
            category: ActivityCategory::try_from(model.category.as_str())?,
            priority: Priority::try_from(model.priority.as_str())?,
            name: model.name,
            description: model.description,
            cost: Money::new(model.cost_minor),
            date: model.date,
            time: model.time,
            duration_minutes: model.duration_minutes,
            position: model.position,
            location: model.location,
            is_booked: model.is_booked,
            booking_reference: model.booking_reference,
        })
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ActivityFields {
    pub name: String,
    pub description: Option<String>,
    pub category: ActivityCategory,
    pub cost: Money,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub duration_minutes: Option<i32>,
    pub location: Option<String>,
    pub priority: Priority,
    pub is_booked: bool,
    pub booking_reference: Option<String>,
}

impl ActiveModel {
    pub(crate) fn new_activity(city_id: Uuid, position: i32, fields: &ActivityFields) -> Self {
        Self {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            city_id: ActiveValue::Set(city_id.to_string()),
            name: ActiveValue::Set(fields.name.clone()),
            description: ActiveValue::Set(fields.description.clone()),
            category: ActiveValue::Set(fields.category.as_str().to_string()),
            cost_minor: ActiveValue::Set(fields.cost.minor()),
            date: ActiveValue::Set(fields.date),
            time: ActiveValue::Set(fields.time),
            duration_minutes: ActiveValue::Set(fields.duration_minutes),
            position: ActiveValue::Set(position),
            location: ActiveValue::Set(fields.location.clone()),
            priority: ActiveValue::Set(fields.priority.as_str().to_string()),
            is_booked: ActiveValue::Set(fields.is_booked),
            booking_reference: ActiveValue::Set(fields.booking_reference.clone()),
            created_at: ActiveValue::Set(util::now()),
            deleted_at: ActiveValue::Set(None),
        }
    }
}

impl From<&Activity> for ActivityFields {
    fn from(activity: &Activity) -> Self {
        Self {
            name: activity.name.clone(),
            description: activity.description.clone(),
            category: activity.category,
            cost: activity.cost,
            date: activity.date,
            time: activity.time,
            duration_minutes: activity.duration_minutes,
            location: activity.location.clone(),
            priority: activity.priority,
            is_booked: activity.is_booked,
            booking_reference: activity.booking_reference.clone(),
        }
    }
}
