// src/routes.rs

use axum::{
    Router,
    http::Method,
    routing::get,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers::exam, state::AppState};

/// Assembles the main application router.
///
/// * Mounts the exam endpoints under /api/exams.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (catalog, session store, exam engine).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .allow_credentials(true);

    let exam_routes = Router::new()
        .route("/", get(exam::list_exam_pages))
        .route("/{slug}", get(exam::show_exam).post(exam::submit_exam));

    Router::new()
        .nest("/api/exams", exam_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
