use sea_orm::{QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, User, ValidationError, users, util};

use super::{Engine, with_tx};

/// Entropy of a bearer token, in bytes.
const ACCESS_TOKEN_BYTES: usize = 32;

impl Engine {
    /// Register a user and mint its bearer token.
    ///
    /// The token is returned once and only stored server side.
    pub async fn create_user(
        &self,
        username: &str,
        email: Option<&str>,
    ) -> ResultEngine<(Uuid, String)> {
        let username = util::normalize_optional_text(Some(username))
            .ok_or_else(|| ValidationError::required("username"))?;
        if username.chars().count() > 50 {
            return Err(ValidationError::new("username", "must be at most 50 characters").into());
        }
        let email = util::normalize_optional_text(email);
        let token = util::random_token(ACCESS_TOKEN_BYTES);

        let user_id = with_tx!(self, |db_tx| {
            let taken = users::Entity::find()
                .filter(users::Column::Username.eq(username.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if taken {
                return Err(ValidationError::new("username", "is already taken").into());
            }
            let model = users::ActiveModel::new_user(username.clone(), email, token.clone())
                .insert(&db_tx)
                .await?;
            util::parse_uuid(&model.id, "user")
        })?;

        tracing::info!("user {username} created");
        Ok((user_id, token))
    }

    /// Resolve a bearer token. `None` when no user holds it.
    pub async fn user_by_token(&self, token: &str) -> ResultEngine<Option<User>> {
        users::Entity::find()
            .filter(users::Column::AccessToken.eq(token.to_string()))
            .one(&self.database)
            .await?
            .map(User::try_from)
            .transpose()
    }

    pub async fn user_by_username(&self, username: &str) -> ResultEngine<User> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username.trim().to_string()))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user".to_string()))
            .and_then(User::try_from)
    }
}
