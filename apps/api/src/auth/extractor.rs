use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;

use crate::auth::find_user_by_email;
use crate::errors::AppError;
use crate::models::user::UserPublic;
use crate::state::AppState;

const CREDENTIALS_ERROR: &str = "Could not validate credentials";

/// The authenticated caller, resolved from `Authorization: Bearer <token>`.
pub struct CurrentUser(pub UserPublic);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = request_token(&parts.headers)?;

        let claims = state.tokens.decode_access_token(token).map_err(|e| {
            warn!("Rejected access token: {e}");
            AppError::Unauthorized(CREDENTIALS_ERROR.to_string())
        })?;

        let user = find_user_by_email(&state.db, &claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized(CREDENTIALS_ERROR.to_string()))?;

        Ok(CurrentUser(user.into()))
    }
}

/// Every missing, malformed or non-Bearer header is the same 401.
fn request_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| AppError::Unauthorized(CREDENTIALS_ERROR.to_string()))
}

/// Pulls the token out of a `Bearer` authorization header. The scheme is case-insensitive.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer   abc"), Some("abc"));
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer"), None);
    }

    #[test]
    fn test_missing_or_foreign_scheme_uses_credentials_error() {
        let mut headers = HeaderMap::new();
        for candidate in [None, Some("Basic dXNlcjpwYXNz"), Some("Bearer ")] {
            headers.remove(AUTHORIZATION);
            if let Some(value) = candidate {
                headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
            }
            match request_token(&headers) {
                Err(AppError::Unauthorized(message)) => assert_eq!(message, CREDENTIALS_ERROR),
                other => panic!("expected 401 for {candidate:?}, got {:?}", other.map(str::to_string)),
            }
        }

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(request_token(&headers).unwrap(), "abc.def.ghi");
    }
}
