use std::sync::Arc;

use axum::{
    response::Redirect,
    routing::{delete, get, get_service, post},
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::registry::ActivityRegistry;
use crate::web::routes::activities;

pub mod error;
pub mod routes;

/// Assemble the application router around a registry handle. Tests build
/// their own registry and call this directly; `main` passes the seeded one.
pub fn app(registry: Arc<ActivityRegistry>) -> Router {
    Router::new()
        // Entry point: hand the browser over to the static front-end
        .route("/", get(|| async { Redirect::to("/static/index.html") }))
        .route("/activities", get(activities::activities_handler))
        .route(
            "/activities/:activity_name/signup",
            post(activities::signup_handler),
        )
        .route(
            "/activities/:activity_name/participants",
            delete(activities::unregister_handler),
        )
        // Static files
        .nest_service(
            "/static",
            get_service(ServeDir::new("static")).layer(SetResponseHeaderLayer::if_not_present(
                CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            )),
        )
        // Layers
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CatchPanicLayer::new())
        // State
        .with_state(registry)
}
