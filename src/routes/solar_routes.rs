use axum::{
    Router,
    routing::{get, post},
};

use crate::controllers::solar_controller::{estimate, health};
use crate::shared_state::AppState;

/// Build the `/api/*` sub-router.
pub fn solar_routes(state: AppState) -> Router {
    Router::new()
        .route("/solar/estimate", post(estimate))
        .route("/health", get(health))
        .with_state(state)
}
