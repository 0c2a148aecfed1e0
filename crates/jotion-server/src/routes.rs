use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::auth::identity_middleware;
use crate::handlers::documents as document_handlers;
use crate::store::DocumentStore;
use crate::Config;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Config,
}

pub fn create_router(store: Arc<dyn DocumentStore>, config: Config) -> Router {
    let state = AppState { store, config };

    // Identity is resolved here; the operations decide whether it is required
    let document_routes = Router::new()
        .route("/", post(document_handlers::create_document))
        .route("/sidebar", get(document_handlers::get_sidebar))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1/documents", document_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
