//! Train/predict orchestration
//!
//! Training is a full batch refit: append the new example, reload the
//! whole store, fit a fresh vectorizer and model over everything, replace
//! the artifact. O(corpus) per call by design.
//!
//! The source this derives from had no locking at all, leaving concurrent
//! trains racing last-writer-wins on the artifact file. Here a
//! process-scoped mutex serializes the append-refit-persist sequence, and
//! artifact writes are atomic renames, so a concurrent reader can see a
//! stale model but never a torn one.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{PredictError, TrainError};
use crate::mathexpr;
use crate::model::{artifact, Artifact, CountVectorizer, MultinomialNb};
use crate::remote::SupabaseStorage;
use crate::store::ExampleStore;
use crate::text;

/// The local model: example store plus persisted classifier artifact,
/// optionally mirrored to remote storage.
pub struct Classifier {
    store: ExampleStore,
    artifact_path: PathBuf,
    remote: Option<SupabaseStorage>,
    train_lock: Mutex<()>,
}

impl Classifier {
    /// Build from configuration, wiring up remote sync when credentials
    /// are present.
    pub fn from_config(config: &Config) -> Result<Self> {
        let remote = SupabaseStorage::from_config(&config.supabase)?;
        Ok(Self::with_paths(
            config.paths.data_file()?,
            config.paths.model_file()?,
            remote,
        ))
    }

    /// Build with explicit paths (used by tests).
    pub fn with_paths(
        data_path: PathBuf,
        artifact_path: PathBuf,
        remote: Option<SupabaseStorage>,
    ) -> Self {
        Self {
            store: ExampleStore::with_path(data_path),
            artifact_path,
            remote,
            train_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &ExampleStore {
        &self.store
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// Append one example and refit the model over the entire store.
    ///
    /// Training succeeds once the local artifact is written; the remote
    /// upload afterwards is best-effort and only logged on failure.
    pub async fn train(&self, input: &str, output: &str) -> Result<(), TrainError> {
        let _guard = self.train_lock.lock().await;

        self.store.append(input, output).map_err(TrainError::Store)?;
        let examples = self.store.load_all().map_err(TrainError::Store)?;

        let inputs: Vec<String> = examples.iter().map(|e| e.input.clone()).collect();
        let labels: Vec<String> = examples.iter().map(|e| e.output.clone()).collect();

        let vectorizer = CountVectorizer::fit(&inputs);
        if vectorizer.is_empty() {
            return Err(TrainError::EmptyVocabulary);
        }
        let rows: Vec<Vec<u32>> = inputs.iter().map(|d| vectorizer.transform(d)).collect();
        let model = MultinomialNb::fit(&rows, &labels, 1.0);

        let artifact = Artifact::new(vectorizer, model, examples.len());
        artifact
            .save(&self.artifact_path)
            .map_err(TrainError::Artifact)?;
        info!(
            examples = examples.len(),
            classes = artifact.model.n_classes(),
            "Retrained model"
        );

        if let Some(remote) = &self.remote {
            if let Err(e) = remote.upload(&self.artifact_path).await {
                warn!("Model upload failed (training still succeeded): {:#}", e);
            }
        }
        Ok(())
    }

    /// Answer an input: math expressions are evaluated directly, anything
    /// else goes through the persisted classifier.
    pub fn predict(&self, input: &str) -> Result<String, PredictError> {
        if mathexpr::is_math_expression(input) {
            let value = mathexpr::evaluate(input)?;
            return Ok(mathexpr::format_number(value));
        }

        if !self.artifact_path.exists() {
            return Err(PredictError::Untrained);
        }
        let artifact = Artifact::load(&self.artifact_path).map_err(PredictError::Artifact)?;

        let row = artifact.vectorizer.transform(&text::clean(input));
        artifact
            .model
            .predict(&row)
            .map(str::to_string)
            .ok_or(PredictError::Untrained)
    }

    /// At startup, fetch the artifact from remote storage if there is no
    /// local copy. Failure (or no remote configured) leaves the model
    /// untrained and is not an error.
    pub async fn ensure_artifact(&self) {
        if self.artifact_path.exists() {
            return;
        }
        let Some(remote) = &self.remote else {
            debug!("No remote sync configured; starting untrained");
            return;
        };
        match self.pull_from(remote).await {
            Ok(()) => {}
            Err(e) => warn!("Could not fetch model artifact at startup: {:#}", e),
        }
    }

    /// Force a download of the artifact from remote storage.
    pub async fn pull(&self) -> Result<()> {
        let remote = self
            .remote
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Remote sync is not configured"))?;
        self.pull_from(remote).await
    }

    async fn pull_from(&self, remote: &SupabaseStorage) -> Result<()> {
        let name = self
            .artifact_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("Artifact path has no file name"))?;
        let bytes = remote.download(name).await?;
        artifact::write_atomic(&self.artifact_path, &bytes)?;
        Ok(())
    }

    /// Delete the local artifact. Returns whether one existed.
    pub fn reset_model(&self) -> Result<bool> {
        match std::fs::remove_file(&self.artifact_path) {
            Ok(()) => {
                info!("Deleted model artifact at {}", self.artifact_path.display());
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the training data log. Returns whether it existed.
    pub fn reset_data(&self) -> Result<bool> {
        self.store.reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn classifier_in(dir: &TempDir) -> Classifier {
        Classifier::with_paths(
            dir.path().join("data").join("training_data.jsonl"),
            dir.path().join("models").join("model.json"),
            None,
        )
    }

    #[tokio::test]
    async fn test_train_then_predict() {
        let dir = TempDir::new().unwrap();
        let classifier = classifier_in(&dir);

        classifier.train("hello", "hi").await.unwrap();
        assert_eq!(classifier.predict("hello").unwrap(), "hi");
    }

    #[tokio::test]
    async fn test_predict_untrained_is_typed_error() {
        let dir = TempDir::new().unwrap();
        let classifier = classifier_in(&dir);

        let err = classifier.predict("hello").unwrap_err();
        assert!(matches!(err, PredictError::Untrained));
        assert_eq!(err.to_string(), "model has not been trained yet");
    }

    #[tokio::test]
    async fn test_math_fast_path_skips_model() {
        let dir = TempDir::new().unwrap();
        let classifier = classifier_in(&dir);

        // Works untrained: the classifier is never consulted.
        assert_eq!(classifier.predict("2 + 2").unwrap(), "4");
        assert_eq!(classifier.predict("10 / 4").unwrap(), "2.5");
        assert!(matches!(
            classifier.predict("1/0"),
            Err(PredictError::Math(_))
        ));
    }

    #[tokio::test]
    async fn test_single_class_corpus_predicts_that_class() {
        let dir = TempDir::new().unwrap();
        let classifier = classifier_in(&dir);

        classifier.train("hello there", "hi").await.unwrap();
        // Known limitation: any non-math input maps to the only class.
        assert_eq!(classifier.predict("something unrelated").unwrap(), "hi");
    }

    #[tokio::test]
    async fn test_empty_vocabulary_is_typed_error() {
        let dir = TempDir::new().unwrap();
        let classifier = classifier_in(&dir);

        let err = classifier.train("???", "shrug").await.unwrap_err();
        assert!(matches!(err, TrainError::EmptyVocabulary));
        // The example was still appended before the refit failed.
        assert_eq!(classifier.store().load_all().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_retrain_replaces_artifact() {
        let dir = TempDir::new().unwrap();
        let classifier = classifier_in(&dir);

        classifier.train("good morning", "morning").await.unwrap();
        classifier.train("good night", "night").await.unwrap();

        assert_eq!(classifier.predict("night").unwrap(), "night");
        let artifact = Artifact::load(classifier.artifact_path()).unwrap();
        assert_eq!(artifact.examples, 2);
        assert_eq!(artifact.model.n_classes(), 2);
    }

    #[tokio::test]
    async fn test_reset_model_returns_to_untrained() {
        let dir = TempDir::new().unwrap();
        let classifier = classifier_in(&dir);

        classifier.train("hello", "hi").await.unwrap();
        assert!(classifier.reset_model().unwrap());
        assert!(!classifier.reset_model().unwrap());
        assert!(matches!(
            classifier.predict("hello"),
            Err(PredictError::Untrained)
        ));
        // Training data survives a model reset.
        assert_eq!(classifier.store().load_all().unwrap().len(), 1);
    }
}
