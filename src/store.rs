//! Example store - append-only training data log
//!
//! One JSON object per line ({"input": ..., "output": ...}), UTF-8,
//! created on first append. Records are never rewritten in place; the only
//! destructive operation is [`ExampleStore::reset`], which deletes the
//! whole file and is treated as a reset to empty.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::text;

/// A single training pair. Identity is positional (append order);
/// duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub input: String,
    pub output: String,
}

/// Append-only JSONL log of training examples.
pub struct ExampleStore {
    path: PathBuf,
}

impl ExampleStore {
    /// Create a store at the default data location.
    pub fn new() -> Result<Self> {
        let path = crate::config::data_dir()?.join("data").join("training_data.jsonl");
        Ok(Self { path })
    }

    /// Create a store backed by a specific file.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one example to the log, creating the file and its parent
    /// directory on demand. Input and output are stored verbatim; no
    /// validation or deduplication.
    pub fn append(&self, input: &str, output: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create training data directory")?;
        }
        let record = Example {
            input: input.to_string(),
            output: output.to_string(),
        };
        let line = serde_json::to_string(&record)
            .context("Failed to encode training example")?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .context("Failed to open training data file")?;
        writeln!(file, "{}", line)
            .context("Failed to append training example")?;
        debug!("Appended example to {}", self.path.display());
        Ok(())
    }

    /// Load every example in file order. Inputs come back cleaned (see
    /// [`crate::text::clean`]); outputs verbatim. A missing file is an
    /// empty store, not an error.
    pub fn load_all(&self) -> Result<Vec<Example>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).context("Failed to read training data file");
            }
        };
        let mut examples = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let mut record: Example = serde_json::from_str(line)
                .context("Failed to parse training data record")?;
            record.input = text::clean(&record.input);
            examples.push(record);
        }
        Ok(examples)
    }

    /// Delete the log file. Returns whether it existed.
    pub fn reset(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Deleted training data at {}", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).context("Failed to delete training data file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ExampleStore {
        ExampleStore::with_path(dir.path().join("data").join("training_data.jsonl"))
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_preserves_call_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append("hello", "hi").unwrap();
        store.append("how are you", "fine").unwrap();
        store.append("hello", "hi again").unwrap();

        let examples = store.load_all().unwrap();
        assert_eq!(examples.len(), 3);
        assert_eq!(examples[0], Example { input: "hello".into(), output: "hi".into() });
        assert_eq!(examples[1], Example { input: "how are you".into(), output: "fine".into() });
        assert_eq!(examples[2], Example { input: "hello".into(), output: "hi again".into() });
    }

    #[test]
    fn test_inputs_are_cleaned_outputs_verbatim() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append("  Hello, World! ", "Hi There!").unwrap();

        let examples = store.load_all().unwrap();
        assert_eq!(examples[0].input, "hello world");
        assert_eq!(examples[0].output, "Hi There!");
    }

    #[test]
    fn test_reset_deletes_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(!store.reset().unwrap());

        store.append("a", "b").unwrap();
        assert!(store.reset().unwrap());
        assert!(store.load_all().unwrap().is_empty());
    }
}
