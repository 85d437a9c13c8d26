/// Session token issuing and verification
///
/// Session tokens are HS256-signed JWTs carrying the user id as the subject.
/// They are never stored server-side: a token is valid exactly when its
/// signature matches the shared secret and its expiry has not passed. There is
/// no revocation list, so rotating the secret invalidates every outstanding
/// token at once.
///
/// # Example
///
/// ```
/// use orgauth_shared::auth::jwt::{issue_session_token, verify_token};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-secret-that-is-at-least-32-bytes!!";
/// let user_id = Uuid::new_v4();
///
/// let token = issue_session_token(user_id, secret)?;
/// let claims = verify_token(&token, secret)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of a session token, also used as the session cookie max-age
pub const SESSION_TTL_DAYS: i64 = 7;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Signing failed (bad key material or serialization failure)
    #[error("Failed to sign token: {0}")]
    Signing(String),

    /// Signature does not match the shared secret
    #[error("Token signature is invalid")]
    InvalidSignature,

    /// Token is past its expiry
    #[error("Token has expired")]
    Expired,

    /// Token could not be decoded at all
    #[error("Malformed token: {0}")]
    Malformed(String),
}

/// Session token claims
///
/// - `sub`: user id
/// - `iat`: issued at (Unix seconds)
/// - `exp`: expiry (Unix seconds), `iat + 7 days` for normal sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: Uuid,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a session expiring [`SESSION_TTL_DAYS`] from now
    pub fn new(user_id: Uuid) -> Self {
        Self::with_expiration(user_id, Duration::days(SESSION_TTL_DAYS))
    }

    /// Creates claims with a custom lifetime
    ///
    /// A negative duration yields claims that are already expired, which is
    /// how the expiry paths are exercised in tests.
    pub fn with_expiration(user_id: Uuid, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Signs claims into a token string
///
/// # Errors
///
/// Returns `TokenError::Signing` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key).map_err(|e| TokenError::Signing(e.to_string()))
}

/// Issues a fresh session token for a user
pub fn issue_session_token(user_id: Uuid, secret: &str) -> Result<String, TokenError> {
    create_token(&Claims::new(user_id), secret)
}

/// Verifies a token and returns its claims
///
/// Checks the HS256 signature and the `exp` claim with zero leeway: a token
/// is rejected as soon as the current time passes its expiry.
///
/// # Errors
///
/// - `TokenError::InvalidSignature` if the signature does not match
/// - `TokenError::Expired` if the token is past its expiry
/// - `TokenError::Malformed` for anything that does not decode
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed(e.to_string()),
    })?;

    Ok(token_data.claims)
}
