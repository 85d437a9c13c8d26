/// API route handlers
///
/// - `health`: liveness and health
/// - `auth`: registration and login
/// - `users`: user lookup
/// - `organisations`: organisations and membership

pub mod auth;
pub mod health;
pub mod organisations;
pub mod users;
