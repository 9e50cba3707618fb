//! Role-based access control extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use fieldops_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires `supervisor` or `admin` role. Rejects with 403 Forbidden otherwise.
///
/// Used for assignment/coverage writes, explicit close, ticket update and
/// delete.
///
/// ```ignore
/// async fn supervise(RequireSupervisor(user): RequireSupervisor) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireSupervisor(pub AuthUser);

impl FromRequestParts<AppState> for RequireSupervisor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_supervisor() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Supervisor or Admin role required".into(),
            )));
        }
        Ok(RequireSupervisor(user))
    }
}
