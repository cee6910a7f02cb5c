//! Users table.
//!
//! A user is identified by a random bearer token minted at creation time.

use chrono::{NaiveDateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{ResultEngine, util};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub created_at: chrono::DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub username: String,
    pub email: Option<String>,
    #[sea_orm(unique)]
    pub access_token: String,
    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::trips::Entity")]
    Trips,
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn new_user(username: String, email: Option<String>, token: String) -> Self {
        Self {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            username: ActiveValue::Set(username),
            email: ActiveValue::Set(email),
            access_token: ActiveValue::Set(token),
            created_at: ActiveValue::Set(util::now()),
        }
    }
}

impl TryFrom<Model> for User {
    type Error = crate::EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: util::parse_uuid(&model.id, "user")?,
            username: model.username,
            email: model.email,
            created_at: util::to_utc(model.created_at),
        })
    }
}
