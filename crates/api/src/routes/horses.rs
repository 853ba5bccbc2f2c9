//! Route definitions for the horse registry.

use axum::routing::get;
use axum::Router;

use crate::handlers::horses;
use crate::state::AppState;

/// Horse registry routes mounted under `/api/v1`.
///
/// ```text
/// GET    /horses          -> list_horses
/// POST   /horses          -> create_horse
/// GET    /horses/{id}     -> get_horse
/// PUT    /horses/{id}     -> update_horse
/// DELETE /horses/{id}     -> delete_horse
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/horses",
            get(horses::list_horses).post(horses::create_horse),
        )
        .route(
            "/horses/{id}",
            get(horses::get_horse)
                .put(horses::update_horse)
                .delete(horses::delete_horse),
        )
}
