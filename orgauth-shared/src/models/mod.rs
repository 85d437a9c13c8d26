/// Database models for orgauth
///
/// # Models
///
/// - `user`: user accounts and credentials
/// - `organisation`: organisations users belong to
/// - `membership`: the many-to-many user/organisation relation
///
/// Each model carries its own SQL. Multi-row writes that must be atomic are
/// composed in [`crate::store::postgres::PgStore`].

pub mod membership;
pub mod organisation;
pub mod user;
