pub mod config;
pub mod db;
pub mod error;
pub mod observability;
pub mod reminders;
pub mod routes;
pub mod server;
pub mod store;

pub use config::Config;
pub use routes::AppState;

/// Create the application router
///
/// Used by `serve` and by integration tests, which drive it without
/// binding a socket.
pub fn create_app(state: AppState) -> axum::Router {
    use axum::{Router, routing::get};
    use routes::{api_routes, health, ready};

    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .merge(api_routes())
        .with_state(state)
}
