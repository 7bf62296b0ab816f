//! Local embedding backend via fastembed

use super::Embedder;
use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Embedder backed by a locally-loaded fastembed model
///
/// The model is synchronous and not Sync, so calls hop onto a blocking
/// thread and serialize on a mutex.
pub struct FastEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
    dimension: usize,
}

impl FastEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        info!("Loading embedding model {}", config.model);

        let model = TextEmbedding::try_new(
            InitOptions::new(model_for(&config.model)).with_show_download_progress(true),
        )
        .map_err(|e| Error::Embedding(format!("Failed to initialize model: {}", e)))?;

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
            model_name: config.model.clone(),
            dimension: config.dimension,
        })
    }
}

/// Resolve a configured model name to a fastembed model
fn model_for(name: &str) -> EmbeddingModel {
    match name {
        "BAAI/bge-small-en-v1.5" => EmbeddingModel::BGESmallENV15,
        "BAAI/bge-base-en-v1.5" => EmbeddingModel::BGEBaseENV15,
        "sentence-transformers/all-MiniLM-L6-v2" => EmbeddingModel::AllMiniLML6V2,
        other => {
            warn!("Unknown embedding model '{}', using bge-small-en-v1.5", other);
            EmbeddingModel::BGESmallENV15
        }
    }
}

#[async_trait]
impl Embedder for FastEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let model = self.model.clone();
        let input = text.to_string();

        let mut vectors = tokio::task::spawn_blocking(move || {
            let model = model.blocking_lock();
            model.embed(vec![input], None)
        })
        .await
        .map_err(|e| Error::Embedding(format!("Task join error: {}", e)))?
        .map_err(|e| Error::Embedding(format!("Embedding failed: {}", e)))?;

        vectors
            .pop()
            .ok_or_else(|| Error::Embedding("Model returned no vector".to_string()))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
