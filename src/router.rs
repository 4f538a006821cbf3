use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::handlers::{health_handler, metrics_handler, summarize_handler};
use crate::middleware::{SUMMARIZE_PATH, rate_limit_middleware, request_logging};
use crate::state::AppState;

// last layer added runs first: logging sees the request before admission
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route(SUMMARIZE_PATH, post(summarize_handler))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit_middleware))
        .layer(middleware::from_fn(request_logging))
        .with_state(state)
}
