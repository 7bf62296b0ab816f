//! Embedding generation
//!
//! Documents are indexed whole and queries arrive one at a time, so the
//! embedder seam is a single-text operation. The default backend runs
//! fastembed locally.

#[cfg(feature = "local-embed")]
mod fastembed_impl;

#[cfg(feature = "local-embed")]
pub use fastembed_impl::*;

use crate::config::EmbeddingConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Trait for embedding providers
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed one text into a vector
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Get the embedding dimension
    fn dimension(&self) -> usize;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Create an embedder based on configuration
pub fn create_embedder(config: &EmbeddingConfig) -> Result<Box<dyn Embedder>> {
    #[cfg(feature = "local-embed")]
    {
        let embedder = FastEmbedder::new(config)?;
        Ok(Box::new(embedder))
    }

    #[cfg(not(feature = "local-embed"))]
    {
        Err(crate::error::Error::Embedding(
            "No embedding backend available. Enable 'local-embed' feature.".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct FixedEmbedder;

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            if text.is_empty() {
                return Err(Error::Embedding("empty input".to_string()));
            }
            Ok(vec![0.5; self.dimension()])
        }

        fn dimension(&self) -> usize {
            4
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_embed_through_trait_object() {
        let embedder: Box<dyn Embedder> = Box::new(FixedEmbedder);
        let vector = embedder.embed("ownership and borrowing").await.unwrap();
        assert_eq!(vector.len(), embedder.dimension());
    }

    #[tokio::test]
    async fn test_embed_propagates_backend_errors() {
        let embedder = FixedEmbedder;
        let result = embedder.embed("").await;
        assert!(matches!(result, Err(Error::Embedding(_))));
    }
}
