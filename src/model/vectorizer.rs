//! Bag-of-words count vectorizer
//!
//! Tokens are lowercased runs of two or more alphanumeric characters;
//! the fitted vocabulary maps each token to a column index in sorted
//! order, so fitting the same corpus always yields the same layout.
//! Out-of-vocabulary tokens at transform time are dropped.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Split text into vocabulary tokens.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2)
        .map(|t| t.to_lowercase())
}

/// A fitted bag-of-words vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountVectorizer {
    vocabulary: BTreeMap<String, usize>,
}

impl CountVectorizer {
    /// Build the vocabulary from the union of tokens across all documents.
    pub fn fit(documents: &[String]) -> Self {
        let tokens: BTreeSet<String> = documents
            .iter()
            .flat_map(|doc| tokenize(doc))
            .collect();
        let vocabulary = tokens
            .into_iter()
            .enumerate()
            .map(|(index, token)| (token, index))
            .collect();
        Self { vocabulary }
    }

    /// Turn a document into a dense count vector over the fitted
    /// vocabulary. Unknown tokens contribute nothing.
    pub fn transform(&self, document: &str) -> Vec<u32> {
        let mut row = vec![0u32; self.vocabulary.len()];
        for token in tokenize(document) {
            if let Some(&index) = self.vocabulary.get(&token) {
                row[index] += 1;
            }
        }
        row
    }

    /// Number of vocabulary entries.
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// True when the fitted corpus produced no usable tokens.
    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fit_builds_sorted_vocabulary() {
        let v = CountVectorizer::fit(&docs(&["zebra apple", "apple mango"]));
        assert_eq!(v.vocabulary_len(), 3);
        // sorted order: apple=0, mango=1, zebra=2
        assert_eq!(v.transform("apple"), vec![1, 0, 0]);
        assert_eq!(v.transform("zebra zebra mango"), vec![0, 1, 2]);
    }

    #[test]
    fn test_short_tokens_ignored() {
        let v = CountVectorizer::fit(&docs(&["a b hello"]));
        assert_eq!(v.vocabulary_len(), 1);
        assert_eq!(v.transform("a hello b"), vec![1]);
    }

    #[test]
    fn test_oov_tokens_dropped() {
        let v = CountVectorizer::fit(&docs(&["hello world"]));
        assert_eq!(v.transform("goodbye cruel world"), vec![0, 1]);
        assert_eq!(v.transform("nothing known"), vec![0, 0]);
    }

    #[test]
    fn test_empty_corpus() {
        let v = CountVectorizer::fit(&[]);
        assert!(v.is_empty());
        assert!(v.transform("anything").is_empty());
    }
}
