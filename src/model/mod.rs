//! Local model - bag-of-words vectorizer, naive-Bayes classifier, and the
//! persisted artifact bundling a fitted pair of the two.
//!
//! Both halves are refit from scratch over the full example store on every
//! training call; there is no partial fit.

pub mod artifact;
pub mod naive_bayes;
pub mod vectorizer;

pub use artifact::Artifact;
pub use naive_bayes::MultinomialNb;
pub use vectorizer::CountVectorizer;
