//! User lookups

use chrono::{DateTime, Utc};
use shared::User;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    phone_number: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            phone_number: row.phone_number,
            created_at: row.created_at,
        }
    }
}

/// Phone number on file for a user
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserPhone {
    pub id: Uuid,
    pub phone_number: Option<String>,
}

impl UserService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Public profile of a user
    pub async fn get_user(&self, id: Uuid) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, phone_number, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        Ok(row.into())
    }

    /// Phone numbers for a batch of users, in one query
    pub async fn phone_numbers(&self, ids: &[Uuid]) -> AppResult<Vec<UserPhone>> {
        let phones = sqlx::query_as::<_, UserPhone>(
            "SELECT id, phone_number FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.db)
        .await?;

        Ok(phones)
    }
}
