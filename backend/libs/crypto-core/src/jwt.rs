//! Shared JWT module for forum services
//!
//! Tokens are signed with a shared secret (HS256). The auth collaborator that
//! issues tokens and every service that validates them must be configured with
//! the same `JWT_SECRET`.
//!
//! ## Security Design
//!
//! - **HS256 only**: the algorithm is pinned, `alg` headers naming anything
//!   else are rejected by `jsonwebtoken`
//! - **Minimum secret length**: secrets shorter than 32 bytes are refused
//! - **No clock leeway**: a token whose `exp` lies in the past is rejected,
//!   whatever the state of its signature
//!
//! ## Usage
//!
//! ```rust
//! use crypto_core::jwt::JwtKeys;
//! use uuid::Uuid;
//!
//! let keys = JwtKeys::from_secret("an-example-secret-that-is-long-enough!").unwrap();
//! let token = keys.generate_access_token(Uuid::new_v4(), "alice").unwrap();
//! let claims = keys.validate_token(&token).unwrap();
//! assert_eq!(claims.username, "alice");
//! ```

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

const ACCESS_TOKEN_EXPIRY_HOURS: i64 = 24;

/// Minimum accepted secret length in bytes
pub const MIN_SECRET_LEN: usize = 32;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// The only `token_type` accepted by `validate_token`
pub const ACCESS_TOKEN_TYPE: &str = "access";

// ============================================================================
// Data Structures
// ============================================================================

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type; `validate_token` rejects anything but "access"
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Username at issuance time
    #[serde(default)]
    pub username: String,
}

fn default_token_type() -> String {
    ACCESS_TOKEN_TYPE.to_string()
}

impl Claims {
    /// Parse the subject claim as a user id
    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|_| JwtError::InvalidSubject)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT secret too short: {0} bytes, need at least 32")]
    WeakSecret(usize),

    #[error("token expired")]
    Expired,

    #[error("token validation failed: {0}")]
    Invalid(String),

    #[error("token subject is not a valid user id")]
    InvalidSubject,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl JwtError {
    pub fn is_expired(&self) -> bool {
        matches!(self, JwtError::Expired)
    }
}

// ============================================================================
// Keys
// ============================================================================

/// Encoding and decoding keys derived from one shared secret.
///
/// Built once at startup and shared through `web::Data`; cheap to clone.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Result<Self, JwtError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(JwtError::WeakSecret(secret.len()));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    // ========================================================================
    // Token Generation
    // ========================================================================

    /// Sign an arbitrary claim set.
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(JWT_ALGORITHM), claims, &self.encoding)
            .map_err(|e| JwtError::Signing(e.to_string()))
    }

    /// Generate an access token valid for `ACCESS_TOKEN_EXPIRY_HOURS`.
    pub fn generate_access_token(&self, user_id: Uuid, username: &str) -> Result<String, JwtError> {
        self.generate_token_with_ttl(user_id, username, Duration::hours(ACCESS_TOKEN_EXPIRY_HOURS))
    }

    /// Generate an access token with a caller-chosen lifetime.
    ///
    /// A negative `ttl` produces a token that is already expired.
    pub fn generate_token_with_ttl(
        &self,
        user_id: Uuid,
        username: &str,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let now = Utc::now();

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            token_type: default_token_type(),
            username: username.to_string(),
        };

        self.encode(&claims)
    }

    // ========================================================================
    // Token Validation
    // ========================================================================

    /// Verify signature and expiry, returning the claims.
    ///
    /// ## Errors
    ///
    /// - `Expired` if `exp` is not in the future
    /// - `Invalid` for a bad signature, wrong algorithm, malformed token or
    ///   a `token_type` other than "access"
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            }
        })?;

        // jsonwebtoken treats `exp == now` as still valid
        if data.claims.exp <= Utc::now().timestamp() {
            return Err(JwtError::Expired);
        }

        if data.claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(JwtError::Invalid(format!(
                "unexpected token type '{}'",
                data.claims.token_type
            )));
        }

        Ok(data.claims)
    }

    /// Validate a token and return its subject as a user id.
    pub fn user_id_from_token(&self, token: &str) -> Result<Uuid, JwtError> {
        self.validate_token(token)?.user_id()
    }
}

// ============================================================================
// Tests
// ============================================================================
