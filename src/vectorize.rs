use std::collections::HashMap;

use tracing::debug;

use crate::models::{FeatureVector, ThemeCatalog};
use crate::preprocess::preprocess;
use crate::themes::{domain_for, match_themes};

/// Term-frequency index over the run's corpus of per-user documents.
pub struct TfIdf {
    doc_terms: Vec<HashMap<String, usize>>,
    doc_freq: HashMap<String, usize>,
}

impl TfIdf {
    /// Index a corpus, one token sequence per document.
    pub fn new(documents: &[Vec<String>]) -> Self {
        let mut doc_terms = Vec::with_capacity(documents.len());
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for tokens in documents {
            let mut counts: HashMap<String, usize> = HashMap::new();
            for token in tokens {
                *counts.entry(token.clone()).or_insert(0) += 1;
            }
            for term in counts.keys() {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            doc_terms.push(counts);
        }

        Self { doc_terms, doc_freq }
    }

    /// Number of documents in the corpus.
    pub fn len(&self) -> usize {
        self.doc_terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_terms.is_empty()
    }

    // raw count of `term` in document `doc`
    fn tf(&self, term: &str, doc: usize) -> f64 {
        self.doc_terms[doc].get(term).copied().unwrap_or(0) as f64
    }

    // smoothed so terms present in every document (or in none) never divide
    // by zero: df == n gives a weight slightly below 1, never negative enough
    // to matter for counting-style tf values
    fn idf(&self, term: &str) -> f64 {
        let df = self.doc_freq.get(term).copied().unwrap_or(0) as f64;
        1.0 + (self.doc_terms.len() as f64 / (1.0 + df)).ln()
    }

    /// Summed tf-idf weight of a token sequence against document `doc`.
    /// Repeated query tokens contribute once per occurrence.
    pub fn score(&self, tokens: &[String], doc: usize) -> f64 {
        tokens.iter().map(|t| self.tf(t, doc) * self.idf(t)).sum()
    }
}

/// Build one feature vector per user from `(user, joined raw text)` pairs.
///
/// Dimension `i` of a user's vector is that user's token sequence scored
/// against corpus document `i` — a similarity-to-corpus profile rather than
/// a vocabulary-indexed bag of words. Downstream cosine distances depend on
/// this exact construction.
pub fn build_vectors(users: &[(String, String)], catalog: &ThemeCatalog) -> Vec<FeatureVector> {
    let documents: Vec<Vec<String>> = users.iter().map(|(_, text)| preprocess(text)).collect();
    let tfidf = TfIdf::new(&documents);

    debug!(
        "Vectorizing corpus - documents={}, themes={}",
        tfidf.len(),
        catalog.themes.len()
    );

    users
        .iter()
        .enumerate()
        .map(|(idx, (user, text))| {
            let dimensions: Vec<f64> = (0..tfidf.len())
                .map(|doc| tfidf.score(&documents[idx], doc))
                .collect();
            let themes = match_themes(text, &catalog.themes);
            let domain = domain_for(&themes, catalog);

            FeatureVector {
                user: user.clone(),
                dimensions,
                themes,
                domain,
            }
        })
        .collect()
}
