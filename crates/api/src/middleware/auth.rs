//! Bearer-token caller extraction.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use fieldops_core::error::CoreError;
use fieldops_core::roles::can_supervise;
use fieldops_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The caller behind a request, taken from a validated access token.
///
/// `user_id` is what ends up in `changed_by` on state overrides.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// `admin`, `supervisor` or `technician`.
    pub role: String,
}

impl AuthUser {
    pub fn is_supervisor(&self) -> bool {
        can_supervise(&self.role)
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.to_string()))
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively and surrounding whitespace is
/// ignored.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| unauthorized("Authorization header is not valid text"))?;

    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or_else(|| unauthorized("Expected: Bearer <token>"))?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(unauthorized("Expected: Bearer <token>"));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(unauthorized("Empty bearer token"));
    }
    Ok(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            unauthorized("Invalid or expired token")
        })?;

        if claims.sub <= 0 {
            return Err(unauthorized("Token subject is not a user id"));
        }

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::http::Request;

    use super::*;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/tickets");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(bearer_token(&parts_with(Some("Bearer abc"))).unwrap(), "abc");
        assert_eq!(bearer_token(&parts_with(Some("bearer  abc "))).unwrap(), "abc");
    }

    #[test]
    fn missing_or_foreign_scheme_is_unauthorized() {
        for header in [None, Some("Basic dXNlcjpwYXNz"), Some("Bearer"), Some("Bearer   ")] {
            assert_matches!(
                bearer_token(&parts_with(header)),
                Err(AppError::Core(CoreError::Unauthorized(_))),
                "header {header:?}"
            );
        }
    }

    #[test]
    fn supervisor_check_follows_role() {
        let user = |role: &str| AuthUser {
            user_id: 1,
            role: role.to_string(),
        };
        assert!(user("supervisor").is_supervisor());
        assert!(user("admin").is_supervisor());
        assert!(!user("technician").is_supervisor());
    }
}
