//! studium - a study-aid web service backed by local RAG
//!
//! This crate provides:
//! - Ingestion of course documents (PDF/TXT) with content-hash deduplication
//! - A Qdrant-backed vector index over extracted document text
//! - Study-aid generation (summary, quiz, evaluation, learning plan) by
//!   combining retrieved snippets with the Anthropic messages API
//! - An axum HTTP surface tying the above together

pub mod config;
pub mod embed;
pub mod error;
pub mod extract;
pub mod fingerprint;
pub mod generate;
pub mod library;
pub mod server;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
