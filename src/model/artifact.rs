//! Persisted (vectorizer, model) pair
//!
//! Serialized as a single JSON blob; the format only has to round-trip
//! through this writer/reader pair. Writes go through a uniquely named
//! temp file followed by a rename, so a concurrent reader sees either the
//! old artifact or the new one, never a torn file.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use super::{CountVectorizer, MultinomialNb};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A fitted (vectorizer, model) pair plus training metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub vectorizer: CountVectorizer,
    pub model: MultinomialNb,
    /// When this artifact was fitted.
    pub trained_at: DateTime<Utc>,
    /// Number of examples in the corpus at fit time.
    pub examples: usize,
}

impl Artifact {
    pub fn new(vectorizer: CountVectorizer, model: MultinomialNb, examples: usize) -> Self {
        Self {
            vectorizer,
            model,
            trained_at: Utc::now(),
            examples,
        }
    }

    /// Write the artifact atomically, replacing any prior one.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec(self).context("Failed to encode model artifact")?;
        write_atomic(path, &bytes)?;
        debug!("Saved model artifact to {}", path.display());
        Ok(())
    }

    /// Load an artifact from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).context("Failed to read model artifact")?;
        serde_json::from_slice(&bytes).context("Failed to decode model artifact")
    }
}

/// Write bytes to a unique sibling temp file, then rename into place.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create model directory")?;
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());
    let tmp = path.with_file_name(format!(
        ".{}.{}.{}.tmp",
        file_name,
        std::process::id(),
        TMP_COUNTER.fetch_add(1, Ordering::Relaxed),
    ));
    fs::write(&tmp, bytes).context("Failed to write model artifact")?;
    fs::rename(&tmp, path).context("Failed to replace model artifact")?;
    Ok(())
}
