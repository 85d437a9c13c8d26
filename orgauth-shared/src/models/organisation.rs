/// Organisation model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE organisations (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description VARCHAR(255),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Organisation a user can belong to
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Organisation {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new organisation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrganisation {
    pub name: String,
    pub description: Option<String>,
}

impl CreateOrganisation {
    /// The organisation created for a user at registration
    ///
    /// ```
    /// use orgauth_shared::models::organisation::CreateOrganisation;
    ///
    /// let org = CreateOrganisation::default_for("Jill");
    /// assert_eq!(org.name, "Jill's Organisation");
    /// ```
    pub fn default_for(first_name: &str) -> Self {
        Self {
            name: format!("{}'s Organisation", first_name),
            description: None,
        }
    }
}

/// Public view of an organisation, as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicOrganisation {
    pub org_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl From<&Organisation> for PublicOrganisation {
    fn from(org: &Organisation) -> Self {
        Self {
            org_id: org.id,
            name: org.name.clone(),
            description: org.description.clone(),
        }
    }
}

impl Organisation {
    /// Inserts a new organisation
    pub async fn create<'e, E>(executor: E, data: CreateOrganisation) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Organisation>(
            r#"
            INSERT INTO organisations (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .fetch_one(executor)
        .await
    }

    /// Finds an organisation by ID
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Organisation>(
            r#"
            SELECT id, name, description, created_at
            FROM organisations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Lists every organisation the user is a member of
    pub async fn list_for_user<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Organisation>(
            r#"
            SELECT o.id, o.name, o.description, o.created_at
            FROM organisations o
            INNER JOIN user_organisations uo ON uo.organisation_id = o.id
            WHERE uo.user_id = $1
            ORDER BY o.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_organisation_name() {
        assert_eq!(CreateOrganisation::default_for("Jill").name, "Jill's Organisation");
        assert_eq!(CreateOrganisation::default_for("O'Neil").name, "O'Neil's Organisation");
        assert!(CreateOrganisation::default_for("Jill").description.is_none());
    }

    #[test]
    fn test_public_organisation_shape() {
        let org = Organisation {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            description: Some("Rockets".to_string()),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(PublicOrganisation::from(&org)).unwrap();
        assert_eq!(json["orgId"], org.id.to_string());
        assert_eq!(json["name"], "Acme");
        assert_eq!(json["description"], "Rockets");
    }
}
