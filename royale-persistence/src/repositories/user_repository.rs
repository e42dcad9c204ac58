use sea_orm::{ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::{prelude::*, users};
use royale_types::{GameError, User};

/// Persistence failures are logged here and surfaced as a generic internal
/// error; the raw driver message never reaches the caller.
pub(crate) fn db_err(err: sea_orm::DbErr) -> GameError {
    tracing::error!("Database error: {}", err);
    GameError::internal("Internal storage error")
}

pub struct UserRepository {
    db: DatabaseConnection,
}

/// Login needs the stored hash alongside the public user view.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn model_to_user(model: users::Model) -> User {
        User {
            id: model.id,
            email: model.email,
            display_name: model.display_name,
            total_winnings_cents: model.total_winnings_cents,
            created_at: model.created_at.to_rfc3339(),
        }
    }

    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
    ) -> Result<User, GameError> {
        let existing = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            return Err(GameError::validation("Email already registered"));
        }

        let user_model = users::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            email: ActiveValue::Set(email.to_string()),
            password_hash: ActiveValue::Set(password_hash.to_string()),
            display_name: ActiveValue::Set(display_name.to_string()),
            total_winnings_cents: ActiveValue::Set(0),
            created_at: ActiveValue::Set(chrono::Utc::now().into()),
        };

        let saved = Users::insert(user_model)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        let created = Users::find_by_id(saved.last_insert_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| GameError::internal("Failed to retrieve created user"))?;

        Ok(Self::model_to_user(created))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, GameError> {
        let user_model = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(user_model.map(Self::model_to_user))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, GameError> {
        let user_model = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(user_model.map(Self::model_to_user))
    }

    pub async fn find_credentials(&self, email: &str) -> Result<Option<UserCredentials>, GameError> {
        let user_model = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(user_model.map(|model| UserCredentials {
            password_hash: model.password_hash.clone(),
            user: Self::model_to_user(model),
        }))
    }

    /// Sum of every user's winnings ledger, feeding the pint-progress view.
    /// Read unsynchronized; slightly stale totals are acceptable for display.
    pub async fn total_winnings(&self) -> Result<i64, GameError> {
        let users = Users::find().all(&self.db).await.map_err(db_err)?;
        Ok(users.iter().map(|u| u.total_winnings_cents).sum())
    }
}
