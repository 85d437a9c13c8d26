/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: session token issuing and verification (HS256, 7-day expiry)
///
/// Both are synchronous and stateless; the auth gate that combines them with
/// a user lookup lives in the API crate.

pub mod jwt;
pub mod password;
