pub mod middleware;
pub mod routes;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::SqlitePool;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use self::middleware::auth as auth_middleware;
use self::routes::{auth, blood_requests, hospitals, search};

fn cors_layer(allow_origin: Option<&str>) -> CorsLayer {
    let origin = match allow_origin
        .map(str::trim)
        .filter(|o| !o.is_empty() && *o != "*")
        .and_then(|o| HeaderValue::from_str(o).ok())
    {
        Some(value) => AllowOrigin::exact(value),
        None => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Full application router. `allow_origin` of `None` or `*` allows any origin.
pub fn build_app(pool: SqlitePool, allow_origin: Option<&str>) -> Router {
    // Everything here runs behind the identity provider session check.
    let protected_routes = Router::new()
        .route("/api/users/me", get(auth::me_handler))
        .route("/api/hospitals", post(hospitals::create_hospital_handler))
        .route("/api/hospitals/my", get(hospitals::my_hospitals_handler))
        .route(
            "/api/hospitals/:id",
            put(hospitals::update_hospital_handler),
        )
        .route(
            "/api/hospitals/:id/inventory",
            get(hospitals::inventory_handler).put(hospitals::update_inventory_handler),
        )
        .route(
            "/api/hospitals/:id/donations",
            get(hospitals::donations_handler).post(hospitals::create_donation_handler),
        )
        .route(
            "/api/hospitals/:id/requests",
            get(hospitals::hospital_requests_handler),
        )
        .route(
            "/api/blood-requests/:id/status",
            put(blood_requests::update_status_handler),
        )
        .layer(axum_middleware::from_fn(auth_middleware::require_auth));

    Router::new()
        // Public routes
        .route(
            "/api/oauth/google/redirect_url",
            get(auth::oauth_redirect_url_handler),
        )
        .route("/api/sessions", post(auth::create_session_handler))
        .route("/api/logout", get(auth::logout_handler))
        .route("/api/districts", get(search::districts_handler))
        .route("/api/search", get(search::search_handler))
        .route("/api/donor-search", get(search::donor_search_handler))
        .route(
            "/api/blood-requests",
            post(blood_requests::create_request_handler),
        )
        // Protected routes
        .merge(protected_routes)
        // Layers
        .layer(cors_layer(allow_origin))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        // State
        .with_state(pool)
}

#[cfg(test)]
mod tests;
