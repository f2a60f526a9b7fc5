use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use tally_store::RecordStore;

use crate::endpoints;
use crate::handler;

/// Shared request state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub top_n: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, top_n: usize) -> Self {
        Self { store, top_n }
    }
}

/// Build the axum router with all Tally endpoints.
pub fn build_router(state: AppState, permissive_cors: bool) -> Router {
    // An empty CorsLayer answers preflights but allows no cross-origin access.
    let cors = if permissive_cors {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route(endpoints::HOME, get(handler::home_handler))
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::SCORES, get(handler::scores_handler))
        .route(endpoints::SUBMIT, post(handler::submit_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
