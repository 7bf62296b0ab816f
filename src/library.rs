//! In-memory document library and ingestion flows
//!
//! The library is the ordered list of uploaded course documents. A document
//! is present in the library iff its point is present in the vector index;
//! the tolerated divergence is removal cleanup, where a failing file or
//! index delete is logged and may leave a stray file or point behind.

use crate::config::Config;
use crate::embed::Embedder;
use crate::error::{Error, Result};
use crate::extract::{extract_text, DocumentFormat};
use crate::fingerprint::{fingerprint, point_id};
use crate::store::{DocPayload, DocPoint, VectorStore};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// An uploaded course document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Content fingerprint (blake3 of the upload bytes)
    pub id: String,

    /// Original filename as uploaded
    pub name: String,

    /// Extracted plain text
    pub content: String,

    /// On-disk location of the stored bytes (content-addressed)
    pub path: PathBuf,

    /// When the document was added
    pub added_at: chrono::DateTime<Utc>,
}

/// Ordered in-memory list of documents
#[derive(Debug, Default)]
pub struct Library {
    documents: Vec<Document>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// All documents in insertion order
    pub fn list(&self) -> &[Document] {
        &self.documents
    }

    /// Look up a document by fingerprint
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn insert(&mut self, doc: Document) {
        self.documents.push(doc);
    }

    fn take(&mut self, id: &str) -> Option<Document> {
        let pos = self.documents.iter().position(|d| d.id == id)?;
        Some(self.documents.remove(pos))
    }
}

/// Validate, deduplicate, extract, and persist an upload
///
/// Rejects unsupported extensions and duplicate content before any state
/// is touched. The stored copy is content-addressed (`<hash>.<ext>`) so
/// user-supplied filenames cannot collide on disk. The returned document
/// is not yet in the library; `ingest_document` finishes the job.
pub fn prepare_upload(
    library: &Library,
    upload_dir: &Path,
    bytes: &[u8],
    filename: &str,
) -> Result<Document> {
    let format = DocumentFormat::from_filename(filename)?;

    let id = fingerprint(bytes);
    if library.contains(&id) {
        debug!("Duplicate upload rejected: {} ({})", filename, id);
        return Err(Error::DuplicateDocument(id));
    }

    let content = extract_text(bytes, format)?;

    std::fs::create_dir_all(upload_dir)?;
    let path = upload_dir.join(format!("{}.{}", id, format.extension()));
    std::fs::write(&path, bytes)?;

    Ok(Document {
        id,
        name: filename.to_string(),
        content,
        path,
        added_at: Utc::now(),
    })
}

/// Ingest raw upload bytes into the library and the vector index
pub async fn ingest_document(
    config: &Config,
    library: &mut Library,
    store: &VectorStore,
    embedder: &dyn Embedder,
    bytes: &[u8],
    filename: &str,
) -> Result<Document> {
    let doc = prepare_upload(library, &config.paths.upload_dir, bytes, filename)?;

    index_document(store, embedder, &doc).await?;
    library.insert(doc.clone());

    info!("Ingested document {} ({})", doc.name, doc.id);
    Ok(doc)
}

/// Embed a document's text and upsert its point
async fn index_document(
    store: &VectorStore,
    embedder: &dyn Embedder,
    doc: &Document,
) -> Result<()> {
    let vector = embedder.embed(&doc.content).await?;

    let point = DocPoint {
        id: point_id(&doc.id),
        vector,
        payload: DocPayload::new(
            doc.id.clone(),
            doc.name.clone(),
            doc.content.clone(),
            doc.added_at.to_rfc3339(),
        ),
    };

    store.add_document(point).await
}

/// Remove a document by fingerprint
///
/// The library record is dropped unconditionally; failures cleaning up the
/// stored file or the index entry are logged and tolerated rather than
/// leaving the record half-removed.
pub async fn remove_document(
    library: &mut Library,
    store: &VectorStore,
    id: &str,
) -> Result<Document> {
    let doc = detach_document(library, id)?;

    if let Err(e) = store.delete_document(point_id(&doc.id)).await {
        warn!("Failed to delete index entry for {}: {}", doc.id, e);
    }

    info!("Removed document {} ({})", doc.name, doc.id);
    Ok(doc)
}

/// Drop a document's library record and best-effort delete its stored file
fn detach_document(library: &mut Library, id: &str) -> Result<Document> {
    let doc = library
        .take(id)
        .ok_or_else(|| Error::DocumentNotFound(id.to_string()))?;

    if doc.path.exists() {
        if let Err(e) = std::fs::remove_file(&doc.path) {
            warn!("Failed to delete stored file {:?}: {}", doc.path, e);
        }
    }

    Ok(doc)
}

/// Rebuild the library and index from files already on disk
///
/// Qdrant state may outlive the process but the library does not, so on
/// startup every file in the upload dir is re-read, re-extracted, and
/// re-upserted. Upserts are idempotent per fingerprint. Unreadable or
/// unsupported files are skipped with a warning.
pub async fn reindex_uploads(
    config: &Config,
    library: &mut Library,
    store: &VectorStore,
    embedder: &dyn Embedder,
) -> Result<usize> {
    let dir = &config.paths.upload_dir;
    if !dir.exists() {
        debug!("Upload dir {:?} does not exist yet, nothing to reindex", dir);
        return Ok(0);
    }

    let mut restored = 0;

    for entry in WalkDir::new(dir).max_depth(1) {
        let entry = match entry {
            Ok(e) if e.file_type().is_file() => e,
            Ok(_) => continue,
            Err(e) => {
                warn!("Skipping unreadable entry in upload dir: {}", e);
                continue;
            }
        };

        match restore_file(config, library, store, embedder, entry.path()).await {
            Ok(true) => restored += 1,
            Ok(false) => {}
            Err(e) => warn!("Skipping {}: {}", entry.path().display(), e),
        }
    }

    info!("Reindexed {} documents from {:?}", restored, dir);
    Ok(restored)
}

async fn restore_file(
    config: &Config,
    library: &mut Library,
    store: &VectorStore,
    embedder: &dyn Embedder,
    path: &Path,
) -> Result<bool> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::Other(format!("Non-UTF8 filename: {}", path.display())))?
        .to_string();

    let format = DocumentFormat::from_filename(&name)?;
    let bytes = std::fs::read(path)?;
    let id = fingerprint(&bytes);

    if library.contains(&id) {
        return Ok(false);
    }

    let content = extract_text(&bytes, format)?;
    let doc = Document {
        id,
        name,
        content,
        path: path.to_path_buf(),
        added_at: Utc::now(),
    };

    index_document(store, embedder, &doc).await?;
    library.insert(doc);
    Ok(true)
}
