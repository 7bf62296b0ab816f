//! Payload schema for Qdrant points
//!
//! Each indexed document is a single point whose payload carries the
//! extracted text, so retrieval returns snippets without a side database.

use qdrant_client::qdrant::{PointStruct, Value as QdrantValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// A point ready to be upserted to Qdrant
#[derive(Debug, Clone)]
pub struct DocPoint {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub payload: DocPayload,
}

impl DocPoint {
    /// Convert to qdrant-client PointStruct
    pub fn to_point_struct(self) -> PointStruct {
        let payload_map = self.payload.to_qdrant_payload();
        PointStruct::new(self.id.to_string(), self.vector, payload_map)
    }
}

/// Payload stored with each document in Qdrant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocPayload {
    /// Document fingerprint (blake3 of the upload bytes)
    pub doc_id: String,

    /// Original filename
    pub name: String,

    /// Extracted plain text
    pub text: String,

    /// When this document was indexed
    pub indexed_at: String,
}

impl DocPayload {
    pub fn new(doc_id: String, name: String, text: String, indexed_at: String) -> Self {
        Self {
            doc_id,
            name,
            text,
            indexed_at,
        }
    }

    /// Convert to Qdrant payload format
    pub fn to_qdrant_payload(self) -> HashMap<String, QdrantValue> {
        let mut map = HashMap::new();

        map.insert("doc_id".to_string(), string_to_qdrant(&self.doc_id));
        map.insert("name".to_string(), string_to_qdrant(&self.name));
        map.insert("text".to_string(), string_to_qdrant(&self.text));
        map.insert("indexed_at".to_string(), string_to_qdrant(&self.indexed_at));

        map
    }
}

fn string_to_qdrant(s: &str) -> QdrantValue {
    QdrantValue {
        kind: Some(qdrant_client::qdrant::value::Kind::StringValue(s.to_string())),
    }
}

impl From<Map<String, Value>> for DocPayload {
    fn from(map: Map<String, Value>) -> Self {
        serde_json::from_value(Value::Object(map)).unwrap_or_else(|_| DocPayload {
            doc_id: String::new(),
            name: String::new(),
            text: String::new(),
            indexed_at: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serialization() {
        let payload = DocPayload::new(
            "abc123".to_string(),
            "notes.txt".to_string(),
            "The course covers ownership and borrowing.".to_string(),
            "2024-01-01T00:00:00Z".to_string(),
        );

        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("doc_id"));
        assert!(json.contains("abc123"));

        let parsed: DocPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name, "notes.txt");
    }

    #[test]
    fn test_payload_from_incomplete_map() {
        let map = Map::new();
        let payload = DocPayload::from(map);
        assert!(payload.doc_id.is_empty());
        assert!(payload.text.is_empty());
    }
}
