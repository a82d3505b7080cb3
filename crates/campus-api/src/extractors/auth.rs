//! Authentication extractor
//!
//! Validates the JWT from the Authorization header, or from the `token`
//! query parameter for clients that cannot set headers.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Query},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use campus_common::Identity;
use serde::Deserialize;

use crate::response::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Authenticated caller extracted from the JWT
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl AuthUser {
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string());

        let token = match header {
            Some(token) => token,
            None => Query::<TokenQuery>::from_request_parts(parts, state)
                .await
                .ok()
                .and_then(|Query(query)| query.token)
                .ok_or(ApiError::MissingAuth)?,
        };
        if token.trim().is_empty() {
            return Err(ApiError::MissingAuth);
        }

        let app_state = AppState::from_ref(state);
        let identity = app_state.jwt_service().authenticate(&token).map_err(|e| {
            tracing::warn!(error = %e, "Invalid access token");
            ApiError::App(e)
        })?;

        Ok(AuthUser(identity))
    }
}
