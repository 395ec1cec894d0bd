// Library exports for covoit
// This allows integration tests and external code to use covoit modules

pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod rides;
pub mod routes;
pub mod state;
pub mod users;
pub mod vehicles;

use axum::Router;

use crate::state::AppState;

/// The full application router, shared between the binary and tests.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::auth::router())
        .merge(routes::profile::router())
        .merge(routes::vehicles::router())
        .merge(routes::catalog::router())
        .merge(routes::rides::router())
        .merge(routes::bookings::router())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
