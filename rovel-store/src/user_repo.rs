use chrono::{DateTime, Utc};
use rovel_domain::user::{Role, User};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            // role is CHECK-constrained in the schema
            role: self.role.parse().unwrap_or(Role::AGENT),
            created_at: self.created_at,
        }
    }
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (name, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, email, password_hash, role, created_at",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_insert)?;

        Ok(row.into_user())
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password_hash, role, created_at
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password_hash, role, created_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    pub async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password_hash, role, created_at
             FROM users ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }

    /// Update name and email, and the credential only when a new hash is
    /// supplied. Returns false when no row matched the id.
    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> Result<bool, StoreError> {
        let result = match password_hash {
            Some(hash) => {
                sqlx::query(
                    "UPDATE users SET name = $1, email = $2, password_hash = $3 WHERE id = $4",
                )
                .bind(name)
                .bind(email)
                .bind(hash)
                .bind(id)
                .execute(&self.pool)
                .await
            }
            None => {
                sqlx::query("UPDATE users SET name = $1, email = $2 WHERE id = $3")
                    .bind(name)
                    .bind(email)
                    .bind(id)
                    .execute(&self.pool)
                    .await
            }
        }
        .map_err(StoreError::from_insert)?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
