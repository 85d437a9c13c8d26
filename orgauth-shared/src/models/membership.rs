/// Membership join between users and organisations
///
/// A user either belongs to an organisation or does not. There are no roles
/// and no ordering, so the table is nothing but the pair.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE user_organisations (
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     organisation_id UUID NOT NULL REFERENCES organisations(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (user_id, organisation_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

use super::user::User;

/// A single user-organisation membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    pub user_id: Uuid,
    pub organisation_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Membership {
    /// Links a user to an organisation
    ///
    /// Idempotent: linking an existing pair is a no-op. Returns `true` if a
    /// new row was written.
    ///
    /// # Errors
    ///
    /// Fails with a foreign key violation if either side does not exist.
    pub async fn link<'e, E>(
        executor: E,
        user_id: Uuid,
        organisation_id: Uuid,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO user_organisations (user_id, organisation_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, organisation_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(organisation_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the members of an organisation
    pub async fn list_members<'e, E>(
        executor: E,
        organisation_id: Uuid,
    ) -> Result<Vec<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.first_name, u.last_name, u.email, u.password_hash, u.phone,
                   u.created_at, u.updated_at
            FROM users u
            INNER JOIN user_organisations uo ON uo.user_id = u.id
            WHERE uo.organisation_id = $1
            ORDER BY uo.created_at
            "#,
        )
        .bind(organisation_id)
        .fetch_all(executor)
        .await
    }
}
