/// Database layer
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: embedded schema migrations
///
/// Queries themselves live with the models in [`crate::models`].

pub mod migrations;
pub mod pool;
