/// PostgreSQL-backed store
///
/// Wraps a `PgPool` and composes the model queries. Writes that touch more
/// than one table run in a transaction that is rolled back on drop if any
/// step fails.
///
/// # Example
///
/// ```no_run
/// use orgauth_shared::db::pool::{create_pool, DatabaseConfig};
/// use orgauth_shared::store::{PgStore, Store};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// let store = PgStore::new(pool);
/// store.ping().await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{
    membership::Membership,
    organisation::{CreateOrganisation, Organisation},
    user::{CreateUser, User},
};

/// Store backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool, for migrations and shutdown
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn register_user(
        &self,
        user: CreateUser,
        organisation: CreateOrganisation,
    ) -> Result<(User, Organisation), StoreError> {
        let mut tx = self.pool.begin().await?;

        let organisation = Organisation::create(&mut *tx, organisation).await?;
        let user = User::create(&mut *tx, user).await?;
        Membership::link(&mut *tx, user.id, organisation.id).await?;

        tx.commit().await?;

        debug!(
            user_id = %user.id,
            org_id = %organisation.id,
            "Registered user with default organisation"
        );
        Ok((user, organisation))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn find_organisation(&self, id: Uuid) -> Result<Option<Organisation>, StoreError> {
        Ok(Organisation::find_by_id(&self.pool, id).await?)
    }

    async fn list_organisations_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Organisation>, StoreError> {
        Ok(Organisation::list_for_user(&self.pool, user_id).await?)
    }

    async fn create_organisation(
        &self,
        creator_id: Uuid,
        organisation: CreateOrganisation,
    ) -> Result<Organisation, StoreError> {
        let mut tx = self.pool.begin().await?;

        let organisation = Organisation::create(&mut *tx, organisation).await?;
        Membership::link(&mut *tx, creator_id, organisation.id).await?;

        tx.commit().await?;
        Ok(organisation)
    }

    async fn add_member(&self, organisation_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        Ok(Membership::link(&self.pool, user_id, organisation_id).await?)
    }

    async fn list_members(&self, organisation_id: Uuid) -> Result<Vec<User>, StoreError> {
        Ok(Membership::list_members(&self.pool, organisation_id).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::db::pool::health_check(&self.pool).await?)
    }
}
