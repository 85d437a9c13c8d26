/// Credential store
///
/// The [`Store`] trait is the single seam between the HTTP flows and
/// persistence. The API builds one store at startup and hands it to every
/// handler through application state.
///
/// # Implementations
///
/// - [`postgres::PgStore`]: PostgreSQL via sqlx, used in production
/// - [`memory::MemoryStore`]: in-process maps behind a lock, used by tests
///   and local development
///
/// Both enforce email uniqueness themselves and report a duplicate as
/// [`StoreError::UniqueViolation`], so callers match on the variant rather
/// than on error text.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    organisation::{CreateOrganisation, Organisation},
    user::{CreateUser, User},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A referenced row does not exist
    #[error("Referenced record does not exist: {0}")]
    MissingReference(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    /// Whether this error is the duplicate-email constraint
    pub fn is_duplicate_email(&self) -> bool {
        matches!(
            self,
            StoreError::UniqueViolation { constraint }
                if constraint == crate::models::user::EMAIL_UNIQUE_CONSTRAINT
        )
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or_default().to_string(),
                };
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::MissingReference(
                    db_err.constraint().unwrap_or_default().to_string(),
                );
            }
        }

        StoreError::Database(err)
    }
}

/// Persistence operations needed by the auth and membership flows
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Creates the organisation, the user and their membership as one unit
    ///
    /// Either all three exist afterwards or none do. A duplicate email fails
    /// with [`StoreError::UniqueViolation`] and leaves no organisation behind.
    async fn register_user(
        &self,
        user: CreateUser,
        organisation: CreateOrganisation,
    ) -> Result<(User, Organisation), StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_organisation(&self, id: Uuid) -> Result<Option<Organisation>, StoreError>;

    /// Organisations the user belongs to, in creation order
    async fn list_organisations_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Organisation>, StoreError>;

    /// Creates an organisation with `creator_id` as its first member
    async fn create_organisation(
        &self,
        creator_id: Uuid,
        organisation: CreateOrganisation,
    ) -> Result<Organisation, StoreError>;

    /// Links a user to an organisation; re-adding a member is a no-op
    ///
    /// Returns `true` if the membership is new.
    async fn add_member(&self, organisation_id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;

    async fn list_members(&self, organisation_id: Uuid) -> Result<Vec<User>, StoreError>;

    /// Round-trips to the backing store
    async fn ping(&self) -> Result<(), StoreError>;
}
