//! Request handlers

use super::AppState;
use crate::error::{Error, Result};
use crate::generate::{generate_study_aid, StudyMode};
use crate::library::{ingest_document, remove_document, Document};
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Document view returned by the API; the extracted text is replaced by
/// its character count to keep list responses small
#[derive(Debug, Serialize)]
pub struct DocumentView {
    pub id: String,
    pub name: String,
    pub path: String,
    pub added_at: String,
    pub content_chars: usize,
}

impl From<&Document> for DocumentView {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: doc.name.clone(),
            path: doc.path.display().to_string(),
            added_at: doc.added_at.to_rfc3339(),
            content_chars: doc.content.chars().count(),
        }
    }
}

/// GET / - service info, including whether a generation key is configured
pub async fn home(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let api_key_set = state.api_key.read().await.is_some();
    let documents = state.library.read().await.len();
    // Point count is informational; an unreachable index should not make
    // the landing page fail
    let indexed_points = state.store.points_count().await.unwrap_or(0);

    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "api_key_set": api_key_set,
        "documents": documents,
        "indexed_points": indexed_points,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SetApiKeyForm {
    pub api_key: String,
}

/// POST /set_api_key - replace the generation API key for subsequent calls
pub async fn set_api_key(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SetApiKeyForm>,
) -> Json<serde_json::Value> {
    let mut key = state.api_key.write().await;
    *key = Some(form.api_key).filter(|k| !k.is_empty());
    info!("Generation API key updated");

    Json(json!({
        "message": "API key updated successfully",
        "api_key_set": key.is_some(),
    }))
}

/// GET /chat - the modes the query form can submit
pub async fn chat() -> Json<serde_json::Value> {
    Json(json!({
        "modes": [
            StudyMode::Resume,
            StudyMode::Quiz,
            StudyMode::Evaluation,
            StudyMode::Apprentissage,
        ],
    }))
}

/// GET /documents - list uploaded documents
pub async fn list_documents(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let library = state.library.read().await;
    let documents: Vec<DocumentView> = library.list().iter().map(DocumentView::from).collect();
    Json(json!({ "documents": documents }))
}

/// POST /add_document - multipart upload of a .pdf/.txt course document
pub async fn add_document(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>> {
    let mut file_data = None;
    let mut filename = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidUpload(e.to_string()))?
    {
        if field.name() == Some("file") {
            filename = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| Error::InvalidUpload(e.to_string()))?;
            file_data = Some(data);
        }
    }

    let file_data =
        file_data.ok_or_else(|| Error::InvalidUpload("Missing 'file' field".to_string()))?;
    if filename.is_empty() {
        return Err(Error::InvalidUpload("Missing filename".to_string()));
    }

    // Write lock held across the whole ingest so a concurrent identical
    // upload cannot slip past the dedup check
    let mut library = state.library.write().await;
    let doc = ingest_document(
        &state.config,
        &mut library,
        &state.store,
        state.embedder.as_ref(),
        &file_data,
        &filename,
    )
    .await?;

    Ok(Json(json!({
        "message": "Document added successfully",
        "document": DocumentView::from(&doc),
    })))
}

/// POST /delete_document/{id} - remove a document by fingerprint
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let mut library = state.library.write().await;
    let doc = remove_document(&mut library, &state.store, &id).await?;

    Ok(Json(json!({
        "message": "Document deleted successfully",
        "id": doc.id,
    })))
}

/// GET /view_document/{id} - the stored file bytes
pub async fn view_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response> {
    let library = state.library.read().await;
    let doc = library
        .get(&id)
        .ok_or_else(|| Error::DocumentNotFound(id.clone()))?;

    let bytes = std::fs::read(&doc.path)?;
    let mime = mime_guess::from_path(&doc.name).first_or_octet_stream();

    Ok((
        [
            (header::CONTENT_TYPE, mime.essence_str().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", doc.name),
            ),
        ],
        bytes,
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct QueryForm {
    pub query: String,
    pub mode: StudyMode,
}

/// POST /process_query - generate a study aid for a query and mode
pub async fn process_query(
    State(state): State<Arc<AppState>>,
    Form(form): Form<QueryForm>,
) -> Result<Json<serde_json::Value>> {
    let api_key = state
        .api_key
        .read()
        .await
        .clone()
        .ok_or(Error::MissingApiKey)?;

    let aid = generate_study_aid(
        &state.config,
        &state.client,
        &state.store,
        state.embedder.as_ref(),
        &api_key,
        &form.query,
        form.mode,
    )
    .await?;

    let rendered = serde_json::to_string_pretty(&aid)?;

    Ok(Json(json!({
        "mode": form.mode,
        "result": aid,
        "messages": [
            { "role": "user", "content": form.query },
            { "role": "assistant", "content": rendered },
        ],
    })))
}
