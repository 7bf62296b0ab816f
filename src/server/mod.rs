//! HTTP surface
//!
//! All mutable state is owned by a single AppState passed to the handlers.
//! The library and the API key each sit behind their own RwLock, so every
//! mutation goes through one serialization point per resource and
//! concurrent uploads/deletes cannot diverge the list from the index.

mod handlers;

use crate::config::Config;
use crate::embed::Embedder;
use crate::error::Result;
use crate::generate::AnthropicClient;
use crate::library::Library;
use crate::store::VectorStore;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub library: RwLock<Library>,
    pub store: VectorStore,
    pub embedder: Box<dyn Embedder>,
    pub client: AnthropicClient,
    /// Generation API key; seeded from the environment, replaceable at
    /// runtime via POST /set_api_key
    pub api_key: RwLock<Option<String>>,
}

impl AppState {
    pub fn new(
        config: Config,
        library: Library,
        store: VectorStore,
        embedder: Box<dyn Embedder>,
    ) -> Self {
        let client = AnthropicClient::new(&config.generation);
        let api_key = config.api_key();

        Self {
            config,
            library: RwLock::new(library),
            store,
            embedder,
            client,
            api_key: RwLock::new(api_key),
        }
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/set_api_key", post(handlers::set_api_key))
        .route("/chat", get(handlers::chat))
        .route("/documents", get(handlers::list_documents))
        .route("/add_document", post(handlers::add_document))
        .route("/delete_document/{id}", post(handlers::delete_document))
        .route("/view_document/{id}", get(handlers::view_document))
        .route("/process_query", post(handlers::process_query))
        .with_state(state)
}

/// Bind and serve until shutdown
pub async fn serve(state: Arc<AppState>) -> Result<()> {
    let addr = state.config.bind_addr.clone();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(crate::error::Error::Io)?;

    Ok(())
}
