//! quire-lambda
//!
//! HTTP surface of the PDF generation service.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use axum::middleware as axum_mw;
use axum::routing::post;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

pub mod config;
pub mod error;
pub mod middleware;
pub mod pipeline;
pub mod routes;
pub mod state;

use state::AppState;

pub const GENERATE_PATH: &str = "/api/generate";

/// Build the application router.
///
/// Only `POST /api/generate` is served. Every other method or path gets the
/// JSON 404 body, CORS preflights included. Responses allow any origin.
pub fn app(state: AppState, max_body_bytes: usize) -> Router {
    let cors = SetResponseHeaderLayer::if_not_present(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );

    Router::new()
        .route(
            GENERATE_PATH,
            post(routes::generate::generate).fallback(routes::not_found),
        )
        .fallback(routes::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(axum_mw::from_fn(middleware::request_log::request_log))
                .layer(DefaultBodyLimit::max(max_body_bytes)),
        )
        .with_state(state)
}
