//! Default values for configuration

/// Default bind address for the HTTP server
pub fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

/// Default Qdrant URL for local development
pub fn default_qdrant_url() -> String {
    std::env::var("QDRANT_URL").unwrap_or_else(|_| "http://127.0.0.1:6334".to_string())
}

/// Default collection name
pub fn default_collection_name() -> String {
    "studium_courses".to_string()
}

/// Default embedding model (BAAI/bge-small-en-v1.5)
pub fn default_embedding_model() -> String {
    "BAAI/bge-small-en-v1.5".to_string()
}

/// Default embedding dimension for bge-small-en-v1.5
pub fn default_embedding_dimension() -> usize {
    384
}

/// Default number of snippets retrieved per query
pub fn default_retrieval_top_k() -> usize {
    2
}

/// Default minimum similarity score
pub fn default_retrieval_min_score() -> f32 {
    0.0
}

/// Default generation model
pub fn default_generation_model() -> String {
    "claude-3-opus-20240229".to_string()
}

/// Default response-size ceiling for generation
pub fn default_generation_max_tokens() -> u32 {
    1024
}

/// Default Anthropic API base URL
pub fn default_api_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

/// Default environment variable name for the API key
pub fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}
