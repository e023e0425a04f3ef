/// Signed session tokens
///
/// After a successful login the principal is carried between requests in an
/// HS256-signed JWT stored in the session cookie. The token holds the user id,
/// the username and the role tags, so authorization checks need no database
/// round-trip.
///
/// # Validation
///
/// - Signature (HMAC-SHA256 with the configured secret)
/// - Expiration and not-before
/// - Issuer is `todolist`
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use todolist_shared::auth::session::{create_session_token, validate_session_token, SessionClaims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-session-secret-of-at-least-32-bytes!!";
/// let claims = SessionClaims::new(7, "anna", vec!["ROLE_USER".into()], Duration::hours(24));
/// let token = create_session_token(&claims, secret)?;
///
/// let restored = validate_session_token(&token, secret)?;
/// assert_eq!(restored.sub, 7);
/// assert_eq!(restored.username, "anna");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::user::{User, UserId};

/// Issuer claim of every session token
pub const SESSION_ISSUER: &str = "todolist";

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Failed to create token
    #[error("Failed to create session token: {0}")]
    CreateError(String),

    /// Signature, format or claim check failed
    #[error("Invalid session token: {0}")]
    Invalid(String),

    /// Token has expired
    #[error("Session has expired")]
    Expired,
}

/// Claims of a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: user id
    pub sub: UserId,

    /// Username at login time
    pub username: String,

    /// Role tags at login time
    ///
    /// Informational only: access checks reload the user from storage.
    pub roles: Vec<String>,

    /// Issuer, always `todolist`
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl SessionClaims {
    pub fn new(
        user_id: UserId,
        username: impl Into<String>,
        roles: Vec<String>,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            username: username.into(),
            roles,
            iss: SESSION_ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Claims for an authenticated user
    pub fn for_user(user: &User, ttl: Duration) -> Self {
        Self::new(user.id, user.username.clone(), user.roles.clone(), ttl)
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs session claims with HS256
pub fn create_session_token(claims: &SessionClaims, secret: &str) -> Result<String, SessionError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| SessionError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a session token and returns its claims
///
/// # Errors
///
/// `SessionError::Expired` for expired tokens, `SessionError::Invalid` for
/// everything else (bad signature, wrong issuer, malformed input).
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[SESSION_ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
        _ => SessionError::Invalid(e.to_string()),
    })?;

    Ok(token_data.claims)
}
