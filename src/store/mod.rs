//! Qdrant vector database integration
//!
//! This module wraps the Qdrant client and provides:
//! - Collection management
//! - Point upsert/delete operations
//! - Nearest-neighbor snippet search

mod payload;

pub use payload::*;

use crate::config::Config;
use crate::error::{Error, Result};
use qdrant_client::qdrant::{
    CreateCollectionBuilder, DeletePointsBuilder, Distance, PointId, SearchPointsBuilder,
    UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

/// Qdrant store handle
pub struct VectorStore {
    client: Qdrant,
    collection: String,
    dimension: usize,
}

impl VectorStore {
    /// Connect to Qdrant using config
    pub async fn connect(config: &Config) -> Result<Self> {
        Self::new(
            &config.qdrant_url,
            &config.collection_name,
            config.embedding.dimension,
        )
        .await
    }

    /// Create a new store connection directly with URL and collection name
    pub async fn new(url: &str, collection: &str, dimension: usize) -> Result<Self> {
        debug!("Connecting to Qdrant at {}", url);

        let client = Qdrant::from_url(url)
            .skip_compatibility_check()
            .build()
            .map_err(|e| Error::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            collection: collection.to_string(),
            dimension,
        })
    }

    /// Ensure the collection exists with correct configuration
    pub async fn ensure_collection(&self) -> Result<()> {
        let exists = self.client.collection_exists(&self.collection).await?;

        if exists {
            debug!("Collection {} already exists", self.collection);
            return Ok(());
        }

        info!(
            "Creating collection {} with dimension {}",
            self.collection, self.dimension
        );

        let vectors_config = VectorParamsBuilder::new(self.dimension as u64, Distance::Cosine);

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection).vectors_config(vectors_config),
            )
            .await?;

        info!("Collection {} created successfully", self.collection);
        Ok(())
    }

    /// Upsert one document point
    pub async fn add_document(&self, point: DocPoint) -> Result<()> {
        debug!(
            "Upserting document {} to collection {}",
            point.payload.doc_id, self.collection
        );

        self.client
            .upsert_points(UpsertPointsBuilder::new(
                &self.collection,
                vec![point.to_point_struct()],
            ))
            .await?;

        Ok(())
    }

    /// Delete a document point by its stable UUID
    pub async fn delete_document(&self, point_id: Uuid) -> Result<()> {
        debug!(
            "Deleting point {} from collection {}",
            point_id, self.collection
        );

        let ids: Vec<PointId> = vec![PointId::from(point_id.to_string())];

        self.client
            .delete_points(DeletePointsBuilder::new(&self.collection).points(ids))
            .await?;

        Ok(())
    }

    /// Search for the nearest document snippets
    pub async fn search(&self, query_vector: Vec<f32>, limit: usize) -> Result<Vec<SnippetHit>> {
        debug!(
            "Searching collection {} with limit {}",
            self.collection, limit
        );

        let search_builder =
            SearchPointsBuilder::new(&self.collection, query_vector, limit as u64)
                .with_payload(true);

        let response = self.client.search_points(search_builder).await?;

        let results: Vec<SnippetHit> = response
            .result
            .into_iter()
            .map(|p| {
                let payload: DocPayload = p
                    .payload
                    .into_iter()
                    .map(|(k, v)| (k, json_from_qdrant_value(v)))
                    .collect::<serde_json::Map<String, Value>>()
                    .into();

                SnippetHit {
                    doc_id: payload.doc_id,
                    name: payload.name,
                    text: payload.text,
                    score: p.score,
                }
            })
            .collect();

        Ok(results)
    }

    /// Number of points currently indexed
    pub async fn points_count(&self) -> Result<u64> {
        let info = self.client.collection_info(&self.collection).await?;
        Ok(info
            .result
            .and_then(|r| r.points_count)
            .unwrap_or(0))
    }
}

/// A retrieved snippet
#[derive(Debug, Clone, serde::Serialize)]
pub struct SnippetHit {
    pub doc_id: String,
    pub name: String,
    pub text: String,
    pub score: f32,
}

/// Convert Qdrant value to serde_json Value
fn json_from_qdrant_value(v: qdrant_client::qdrant::Value) -> Value {
    use qdrant_client::qdrant::value::Kind;

    match v.kind {
        Some(Kind::NullValue(_)) => Value::Null,
        Some(Kind::BoolValue(b)) => Value::Bool(b),
        Some(Kind::IntegerValue(i)) => Value::Number(i.into()),
        Some(Kind::DoubleValue(d)) => serde_json::Number::from_f64(d)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Some(Kind::StringValue(s)) => Value::String(s),
        Some(Kind::ListValue(list)) => {
            Value::Array(list.values.into_iter().map(json_from_qdrant_value).collect())
        }
        Some(Kind::StructValue(s)) => Value::Object(
            s.fields
                .into_iter()
                .map(|(k, v)| (k, json_from_qdrant_value(v)))
                .collect(),
        ),
        None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdrant_client::qdrant::value::Kind;

    #[test]
    fn test_json_from_qdrant_string() {
        let v = qdrant_client::qdrant::Value {
            kind: Some(Kind::StringValue("lecture notes".to_string())),
        };
        assert_eq!(json_from_qdrant_value(v), Value::String("lecture notes".into()));
    }

    #[test]
    fn test_json_from_qdrant_null() {
        let v = qdrant_client::qdrant::Value { kind: None };
        assert_eq!(json_from_qdrant_value(v), Value::Null);
    }
}
