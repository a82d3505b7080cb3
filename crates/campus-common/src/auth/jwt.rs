//! JWT utilities for authentication
//!
//! Access tokens are issued by the platform's login flow; the chat only
//! needs to verify them and turn the claims into an [`Identity`].

use campus_core::UserId;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID). Older tokens carry it as `user_id`.
    #[serde(alias = "user_id")]
    pub sub: UserId,
    /// Institutional id of the user
    #[serde(default)]
    pub sut_id: String,
    /// Platform role (student, admin, ...)
    #[serde(default)]
    pub role: String,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Check if the token is expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Canonical identity carried by these claims
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.sub,
            sut_id: self.sut_id.clone(),
            role: self.role.clone(),
        }
    }
}

/// Authenticated caller
///
/// Produced once when a token is verified and passed along as-is; the user
/// id is never re-read from request data after that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub sut_id: String,
    pub role: String,
}

impl Identity {
    pub fn new(user_id: UserId, sut_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            user_id,
            sut_id: sut_id.into(),
            role: role.into(),
        }
    }
}

/// JWT service for encoding and decoding tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: i64,
}

impl JwtService {
    /// Create a new JWT service with the given secret and expiry (seconds)
    #[must_use]
    pub fn new(secret: &str, access_token_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry,
        }
    }

    /// Issue an access token for an identity
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue_access_token(&self, identity: &Identity) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: identity.user_id,
            sut_id: identity.sut_id.clone(),
            role: identity.role.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode JWT")))
    }

    /// Decode and validate a JWT token
    ///
    /// # Errors
    /// Returns an error if the token is invalid or expired
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            }
        })?;

        Ok(token_data.claims)
    }

    /// Verify an access token and return the caller's identity
    ///
    /// # Errors
    /// Returns an error if the token is invalid or expired
    pub fn authenticate(&self, token: &str) -> Result<Identity, AppError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::MissingAuth);
        }
        self.decode_token(token).map(|claims| claims.identity())
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expiry", &self.access_token_expiry)
            .finish_non_exhaustive()
    }
}
