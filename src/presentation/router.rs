use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    account_handler, create_checkout_session_handler, get_transcription_handler, health_handler,
    list_transcriptions_handler, root_handler, transcribe_handler,
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

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/transcribe", post(transcribe_handler))
        .route(
            "/create-checkout-session",
            post(create_checkout_session_handler),
        )
        .route(
            "/api/create-checkout-session",
            post(create_checkout_session_handler),
        )
        .route("/account", get(account_handler))
        .route("/transcriptions", get(list_transcriptions_handler))
        .route("/transcriptions/{id}", get(get_transcription_handler))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
