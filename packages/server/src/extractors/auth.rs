use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};

use crate::error::AppError;
use crate::state::AppState;

/// Proof that the request carried the configured `Authorization: Bearer <token>`.
///
/// Add this as a handler parameter to require authentication.
pub struct ApiToken;

/// Token part of a `Bearer` authorization header. The scheme is case-insensitive.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for ApiToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = parse_bearer(auth_header).ok_or(AppError::TokenInvalid)?;
        if token != state.config.auth.api_token {
            return Err(AppError::TokenInvalid);
        }

        Ok(ApiToken)
    }
}
