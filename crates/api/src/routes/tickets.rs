//! Route definitions for the `/tickets` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::tickets;
use crate::state::AppState;

/// Routes mounted at `/tickets`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
/// POST   /{id}/checkin              -> check_in
/// POST   /{id}/checkout             -> check_out
/// PUT    /{id}/cerrar               -> close
/// GET    /{id}/closure-audits       -> closure_audits
/// GET    /{id}/state-overrides      -> state_overrides
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tickets::list).post(tickets::create))
        .route(
            "/{id}",
            get(tickets::get_by_id)
                .put(tickets::update)
                .delete(tickets::delete),
        )
        .route("/{id}/checkin", post(tickets::check_in))
        .route("/{id}/checkout", post(tickets::check_out))
        .route("/{id}/cerrar", put(tickets::close))
        .route("/{id}/closure-audits", get(tickets::closure_audits))
        .route("/{id}/state-overrides", get(tickets::state_overrides))
}
