//! Route definitions for `/asignaciones`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::assignments;
use crate::state::AppState;

/// Routes mounted at `/asignaciones`.
///
/// ```text
/// GET    /                          -> list
/// DELETE /{id}                      -> deactivate
/// POST   /directa                   -> create_direct
/// POST   /departamento              -> create_department
/// GET    /duenio/{client_id}        -> owner
/// POST   /recalcular/{client_id}    -> recalculate
/// GET    /coberturas                -> list_coverage
/// POST   /coberturas                -> create_coverage
/// DELETE /coberturas/{id}           -> deactivate_coverage
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assignments::list))
        .route("/{id}", delete(assignments::deactivate))
        .route("/directa", post(assignments::create_direct))
        .route("/departamento", post(assignments::create_department))
        .route("/duenio/{client_id}", get(assignments::owner))
        .route("/recalcular/{client_id}", post(assignments::recalculate))
        .route(
            "/coberturas",
            get(assignments::list_coverage).post(assignments::create_coverage),
        )
        .route("/coberturas/{id}", delete(assignments::deactivate_coverage))
}
