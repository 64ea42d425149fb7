//! Multinomial naive Bayes over count vectors
//!
//! Each distinct output string is its own class. That means free-text
//! replies are modelled as unordered labels, which degrades as reply
//! diversity grows; it is the inherited design, kept as-is. Laplace
//! smoothing with alpha = 1.0, ties broken by sorted class order.

use serde::{Deserialize, Serialize};

/// A fitted multinomial naive-Bayes classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNb {
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    /// Per-class log P(token | class), indexed [class][feature].
    feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNb {
    /// Fit from count-vector rows and their labels. `rows` and `labels`
    /// must be the same length; rows must share one width. A single-class
    /// corpus is legal and will always predict that class.
    pub fn fit(rows: &[Vec<u32>], labels: &[String], alpha: f64) -> Self {
        let mut classes: Vec<String> = labels.to_vec();
        classes.sort();
        classes.dedup();

        let n_features = rows.first().map_or(0, |r| r.len());
        let n_docs = rows.len() as f64;

        let mut class_log_prior = Vec::with_capacity(classes.len());
        let mut feature_log_prob = Vec::with_capacity(classes.len());

        for class in &classes {
            let mut doc_count = 0usize;
            let mut token_counts = vec![0u64; n_features];
            for (row, label) in rows.iter().zip(labels) {
                if label != class {
                    continue;
                }
                doc_count += 1;
                for (total, &count) in token_counts.iter_mut().zip(row) {
                    *total += count as u64;
                }
            }
            class_log_prior.push((doc_count as f64 / n_docs).ln());

            let total_tokens: u64 = token_counts.iter().sum();
            let denominator = total_tokens as f64 + alpha * n_features as f64;
            let log_probs = token_counts
                .iter()
                .map(|&count| ((count as f64 + alpha) / denominator).ln())
                .collect();
            feature_log_prob.push(log_probs);
        }

        Self {
            classes,
            class_log_prior,
            feature_log_prob,
        }
    }

    /// Predict the most probable class for a count vector. Returns `None`
    /// only for a model fitted without classes.
    pub fn predict(&self, row: &[u32]) -> Option<&str> {
        let mut best: Option<(usize, f64)> = None;
        for (index, (prior, log_probs)) in self
            .class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .enumerate()
        {
            let mut score = *prior;
            for (&count, log_prob) in row.iter().zip(log_probs) {
                if count > 0 {
                    score += count as f64 * log_prob;
                }
            }
            // Strictly greater keeps the first class on ties (sorted order).
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((index, score)),
            }
        }
        best.map(|(index, _)| self.classes[index].as_str())
    }

    /// Number of distinct classes.
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}
