pub mod assignments;
pub mod health;
pub mod tickets;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /tickets                                   list, create
/// /tickets/{id}                              get, update, delete
/// /tickets/{id}/checkin                      check-in (POST)
/// /tickets/{id}/checkout                     check-out (POST)
/// /tickets/{id}/cerrar                       explicit close (PUT)
/// /tickets/{id}/closure-audits               notification audit trail
/// /tickets/{id}/state-overrides              administrative state changes
///
/// /asignaciones                              list rules
/// /asignaciones/{id}                         deactivate (DELETE)
/// /asignaciones/directa                      create direct rule (POST)
/// /asignaciones/departamento                 create department rule + coverage (POST)
/// /asignaciones/duenio/{client_id}           query owner
/// /asignaciones/recalcular/{client_id}       recalculate owner (POST)
/// /asignaciones/coberturas                   list, create coverage
/// /asignaciones/coberturas/{id}              deactivate coverage (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/tickets", tickets::router())
        .nest("/asignaciones", assignments::router())
}
