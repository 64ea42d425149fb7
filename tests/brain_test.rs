//! End-to-end tests for the local brain: store ordering, train/predict,
//! degenerate corpora, and artifact integrity under concurrent training.

use std::sync::Arc;
use tempfile::TempDir;

use fankygpt::classifier::Classifier;
use fankygpt::error::PredictError;
use fankygpt::model::Artifact;
use fankygpt::store::ExampleStore;

fn classifier_in(dir: &TempDir) -> Classifier {
    Classifier::with_paths(
        dir.path().join("data").join("training_data.jsonl"),
        dir.path().join("models").join("model.json"),
        None,
    )
}

#[tokio::test]
async fn store_preserves_train_call_order() {
    let dir = TempDir::new().unwrap();
    let classifier = classifier_in(&dir);

    let pairs = [
        ("good morning", "morning"),
        ("good night", "night"),
        ("good morning again", "morning"),
    ];
    for (input, output) in pairs {
        classifier.train(input, output).await.unwrap();
    }

    let examples = classifier.store().load_all().unwrap();
    assert_eq!(examples.len(), pairs.len());
    for (example, (input, output)) in examples.iter().zip(pairs) {
        assert_eq!(example.input, input);
        assert_eq!(example.output, output);
    }
}

#[tokio::test]
async fn trained_pair_is_recalled() {
    let dir = TempDir::new().unwrap();
    let classifier = classifier_in(&dir);

    classifier.train("hello", "hi").await.unwrap();
    assert_eq!(classifier.predict("hello").unwrap(), "hi");

    // Cleaning applies at prediction time too.
    assert_eq!(classifier.predict("  HELLO!! ").unwrap(), "hi");
}

#[tokio::test]
async fn classifier_separates_classes() {
    let dir = TempDir::new().unwrap();
    let classifier = classifier_in(&dir);

    classifier.train("hello there friend", "hi").await.unwrap();
    classifier.train("hi hello", "hi").await.unwrap();
    classifier.train("goodbye see you", "bye").await.unwrap();
    classifier.train("bye goodbye now", "bye").await.unwrap();

    assert_eq!(classifier.predict("hello friend").unwrap(), "hi");
    assert_eq!(classifier.predict("goodbye").unwrap(), "bye");
}

#[tokio::test]
async fn math_input_bypasses_the_model() {
    let dir = TempDir::new().unwrap();
    let classifier = classifier_in(&dir);

    // Train a pair whose input would also pass cleaning; math wins first.
    classifier.train("hello", "hi").await.unwrap();
    assert_eq!(classifier.predict("2 + 2").unwrap(), "4");
    assert_eq!(classifier.predict("sqrt(16)").unwrap(), "4");
    assert_eq!(classifier.predict("3^2").unwrap(), "9");
    assert_eq!(classifier.predict("10 / 4").unwrap(), "2.5");

    // Whitelisted letters that are not a valid expression fail with an
    // error value instead of reaching the classifier or panicking.
    assert!(matches!(
        classifier.predict("sin"),
        Err(PredictError::Math(_))
    ));
    assert!(matches!(
        classifier.predict("1/0"),
        Err(PredictError::Math(_))
    ));
}

#[tokio::test]
async fn deeply_nested_math_input_is_an_error_value() {
    let dir = TempDir::new().unwrap();
    let classifier = classifier_in(&dir);

    // All-whitelist characters, so this takes the math fast path; the
    // parser has to reject it as a value rather than crash the process.
    let deep = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
    assert!(matches!(
        classifier.predict(&deep),
        Err(PredictError::Math(_))
    ));
}

#[tokio::test]
async fn untrained_predict_is_a_value_not_a_panic() {
    let dir = TempDir::new().unwrap();
    let classifier = classifier_in(&dir);

    assert!(matches!(
        classifier.predict("anything at all"),
        Err(PredictError::Untrained)
    ));
}

#[tokio::test]
async fn unreadable_artifact_is_reported_as_such() {
    let dir = TempDir::new().unwrap();
    let classifier = classifier_in(&dir);

    let artifact_path = classifier.artifact_path().to_path_buf();
    std::fs::create_dir_all(artifact_path.parent().unwrap()).unwrap();
    std::fs::write(&artifact_path, b"not json").unwrap();

    assert!(matches!(
        classifier.predict("hello"),
        Err(PredictError::Artifact(_))
    ));
}

#[tokio::test]
async fn reset_data_then_retrain_starts_fresh() {
    let dir = TempDir::new().unwrap();
    let classifier = classifier_in(&dir);

    classifier.train("old question", "old answer").await.unwrap();
    assert!(classifier.reset_data().unwrap());

    classifier.train("new question", "new answer").await.unwrap();
    let examples = classifier.store().load_all().unwrap();
    assert_eq!(examples.len(), 1);
    // Refit saw only the fresh store, so the old class is gone.
    assert_eq!(classifier.predict("anything").unwrap(), "new answer");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_training_never_tears_the_artifact() {
    let dir = TempDir::new().unwrap();
    let classifier = Arc::new(classifier_in(&dir));

    let mut handles = Vec::new();
    for i in 0..16 {
        let classifier = Arc::clone(&classifier);
        handles.push(tokio::spawn(async move {
            classifier
                .train(&format!("question number {}", i), &format!("answer {}", i))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // All appends landed, and the artifact reads back whole.
    assert_eq!(classifier.store().load_all().unwrap().len(), 16);
    let artifact = Artifact::load(classifier.artifact_path()).unwrap();
    assert_eq!(artifact.examples, 16);
    assert_eq!(artifact.model.n_classes(), 16);
    assert!(classifier.predict("question number 3").is_ok());
}

#[tokio::test]
async fn store_is_usable_standalone() {
    let dir = TempDir::new().unwrap();
    let store = ExampleStore::with_path(dir.path().join("log.jsonl"));

    store.append("Input ONE!", "Output One").unwrap();
    let examples = store.load_all().unwrap();
    assert_eq!(examples[0].input, "input one");
    assert_eq!(examples[0].output, "Output One");
}
