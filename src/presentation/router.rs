use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    auditions_handler, health_handler, reprocess_script_handler, script_analysis_handler,
    script_status_handler, submit_script_handler, voice_assignments_handler, voicing_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);
    let media_root = state.media_root.clone();

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/scripts", post(submit_script_handler))
        .route("/api/v1/scripts/{script_id}", get(script_analysis_handler))
        .route(
            "/api/v1/scripts/{script_id}/status",
            get(script_status_handler),
        )
        .route(
            "/api/v1/scripts/{script_id}/reprocess",
            post(reprocess_script_handler),
        )
        .route(
            "/api/v1/scripts/{script_id}/voices",
            get(voice_assignments_handler),
        )
        .route(
            "/api/v1/scripts/{script_id}/auditions",
            post(auditions_handler),
        )
        .route(
            "/api/v1/scripts/{script_id}/voicing",
            post(voicing_handler),
        );

    if let Some(root) = media_root {
        router = router.nest_service("/media", ServeDir::new(root));
    }

    router
        .layer(body_limit)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
