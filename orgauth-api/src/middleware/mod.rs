/// Request guards
///
/// - `auth`: session extraction and the `AuthUser` gate

pub mod auth;
