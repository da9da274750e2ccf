//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`, with `/health` also served at the root
//! for load balancers. Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        // Query sessions
        .route(
            "/sessions",
            post(handlers::session::open_session).get(handlers::session::list_sessions),
        )
        .route(
            "/sessions/{id}",
            get(handlers::session::get_session).delete(handlers::session::close_session),
        )
        .route(
            "/sessions/{id}/messages",
            post(handlers::session::post_message),
        )
        .route(
            "/sessions/{id}/input",
            axum::routing::put(handlers::session::update_input),
        )
        .route(
            "/sessions/{id}/cancel",
            post(handlers::session::cancel_request),
        )
        .route(
            "/sessions/{id}/events",
            get(handlers::session::session_events),
        )
        // Catalog
        .route("/customers", get(handlers::catalog::list_customers))
        .route("/customers/summary", get(handlers::catalog::customer_summary))
        .route("/menu", get(handlers::catalog::list_menu))
        .route("/menu/categories", get(handlers::catalog::menu_categories))
        .route("/reservations", get(handlers::catalog::list_reservations))
        .route(
            "/reservations/summary",
            get(handlers::catalog::reservation_summary),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health::health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
