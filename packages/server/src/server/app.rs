//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderName, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::middleware::{identity_middleware, ACTOR_ID_HEADER, ACTOR_ROLE_HEADER};
use crate::server::routes::{
    add_favorite_handler, approve_point_handler, create_point_handler, delete_point_handler,
    edit_point_handler, get_favorite_handler, get_point_handler, health_handler,
    list_favorites_handler, list_points_handler, managed_points_handler, nearby_points_handler,
    organization_points_handler, pending_points_handler, reject_point_handler,
    remove_favorite_handler, schedule_favorite_handler, search_points_handler,
    tag_favorite_handler, toggle_point_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

/// Build the Axum application router
///
/// Every request is bounded by `request_timeout`.
pub fn build_app(deps: ServerDeps, request_timeout: Duration) -> Router {
    let app_state = AppState {
        deps: Arc::new(deps),
    };

    // CORS configuration - identity headers come from the fronting gateway
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static(ACTOR_ID_HEADER),
            HeaderName::from_static(ACTOR_ROLE_HEADER),
        ]);

    let points = Router::new()
        .route("/", get(list_points_handler).post(create_point_handler))
        .route("/gestion", get(managed_points_handler))
        .route("/pendientes", get(pending_points_handler))
        .route("/organizacion/:id", get(organization_points_handler))
        .route("/buscar", get(search_points_handler))
        .route("/cercanos", get(nearby_points_handler))
        .route(
            "/:id",
            get(get_point_handler)
                .put(edit_point_handler)
                .delete(delete_point_handler),
        )
        .route("/:id/aprobar", post(approve_point_handler))
        .route("/:id/rechazar", post(reject_point_handler))
        .route("/:id/alternar-activo", post(toggle_point_handler));

    let favorites = Router::new()
        .route("/", post(add_favorite_handler))
        .route("/usuario/:donor_id", get(list_favorites_handler))
        .route(
            "/:id",
            get(get_favorite_handler).delete(remove_favorite_handler),
        )
        .route("/:id/etiqueta", put(tag_favorite_handler))
        .route("/:id/agendar", put(schedule_favorite_handler));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/puntos-donacion", points)
        .nest("/favoritos", favorites)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(identity_middleware))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
