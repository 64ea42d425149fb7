//! Typed error kinds for training, prediction, and math evaluation
//!
//! The original behavior was to flatten every failure into a formatted
//! string. These enums keep the same taxonomy (untrained state, evaluation
//! error, sync error) but let callers branch programmatically; the CLI
//! renders them back into human-readable messages.

use thiserror::Error;

/// Errors from the math-expression evaluator.
#[derive(Debug, Error)]
pub enum MathError {
    #[error("unexpected character '{0}' in expression")]
    UnexpectedChar(char),

    #[error("expression ended unexpectedly")]
    UnexpectedEnd,

    #[error("unexpected '{0}' in expression")]
    UnexpectedToken(String),

    #[error("unknown name '{0}'")]
    UnknownName(String),

    #[error("'{0}' is a function and needs arguments, e.g. {0}(1)")]
    MissingArguments(String),

    #[error("{name} takes {expected} argument(s), got {got}")]
    WrongArgCount {
        name: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("expression is nested too deeply")]
    TooDeep,

    #[error("math domain error: {0}")]
    Domain(&'static str),

    #[error("result is not a finite number")]
    NotFinite,
}

/// Errors from [`crate::classifier::Classifier::train`].
///
/// Remote sync failures are deliberately absent: uploads are best-effort
/// and only logged, training succeeds once the local artifact is written.
#[derive(Debug, Error)]
pub enum TrainError {
    /// Every input in the corpus cleaned down to zero usable tokens,
    /// so there is nothing to build a vocabulary from.
    #[error("training corpus has no usable tokens to build a vocabulary from")]
    EmptyVocabulary,

    #[error("failed to update the example store")]
    Store(#[source] anyhow::Error),

    #[error("failed to persist the model artifact")]
    Artifact(#[source] anyhow::Error),
}

/// Errors from [`crate::classifier::Classifier::predict`].
#[derive(Debug, Error)]
pub enum PredictError {
    /// No artifact on disk (and none could be fetched remotely).
    #[error("model has not been trained yet")]
    Untrained,

    /// An artifact exists but could not be read back.
    #[error("model artifact could not be loaded")]
    Artifact(#[source] anyhow::Error),

    /// Input looked like a math expression but failed to evaluate.
    #[error("invalid math expression: {0}")]
    Math(#[from] MathError),
}
