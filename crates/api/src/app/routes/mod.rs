use axum::{Router, routing::get};

pub mod auth;
pub mod bookings;
pub mod properties;
pub mod storage;
pub mod system;

/// Router for unauthenticated endpoints (listing browse + auth).
pub fn public_router() -> Router {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/properties", properties::public_router())
}

/// Router for authenticated (session-scoped) endpoints.
pub fn protected_router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/properties", properties::protected_router())
        .nest("/bookings", bookings::router())
        .nest("/storage", storage::router())
}
