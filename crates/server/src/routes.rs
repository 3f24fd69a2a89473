//! Router, shared state and the listener loop.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::middleware;
use axum::routing::get;
use axum::Router;
use catalog::MovieStore;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::ServerConfig;
use crate::handlers;
use crate::origin::{self, OriginGate};

/// State shared by every handler.
///
/// The store lives behind one lock; each handler holds it for the whole of
/// its read-modify-write step so ids stay unique and lookups stay consistent.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<MovieStore>>,
    pub gate: Arc<OriginGate>,
}

impl AppState {
    pub fn new(store: MovieStore, gate: OriginGate) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            gate: Arc::new(gate),
        }
    }
}

/// Build the `/movies` router with the origin gate on every route
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/movies",
            get(handlers::list_movies)
                .post(handlers::create_movie)
                .options(handlers::preflight),
        )
        .route(
            "/movies/:id",
            get(handlers::get_movie)
                .patch(handlers::update_movie)
                .delete(handlers::delete_movie)
                .options(handlers::preflight),
        )
        .layer(middleware::from_fn_with_state(
            state.gate.clone(),
            origin::apply_origin_gate,
        ))
        .with_state(state)
}

/// Serve `state` on an already-bound listener until the process exits
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let app = router(state);
    axum::serve(listener, app).await.context("HTTP server failed")
}

/// Load the seed, bind the configured address and serve
pub async fn run(config: ServerConfig) -> Result<()> {
    let store = config.load_store().context("Failed to load movie seed")?;
    info!("Movie store ready with {} movies", store.len());

    let state = AppState::new(store, config.origin_gate());
    info!("Allowed origins: {}", state.gate.allowed().join(", "));

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("server listening on port http://{}", addr);

    serve(listener, state).await
}
