//! The shared term-weighting model
//!
//! Turns free text into a fixed-length weighted term vector so cosine
//! similarity is meaningful across all thread centroids. Vocabulary and
//! inverse-document-frequency weights are fit once over the existing thread
//! titles; terms outside the fitted vocabulary contribute nothing.
//!
//! The frozen vocabulary is a documented limitation: text about genuinely
//! novel topics embeds into an impoverished or zero vector as the process
//! ages. Re-fitting mid-stream would silently invalidate every stored
//! centroid's dimensionality, so refits only happen through the engine's
//! administrative rebuild.

use std::collections::{HashMap, HashSet};

/// Common English stop words excluded from the vocabulary
const STOP_WORDS: &[&str] = &[
    "an", "as", "at", "be", "by", "do", "go", "he", "if", "in", "is", "it", "my", "no", "of",
    "on", "or", "so", "to", "up", "us", "we",
    "about", "after", "again", "all", "also", "and", "any", "are", "back", "because", "been",
    "before", "being", "between", "both", "but", "came", "can", "come", "could", "did", "does",
    "down", "each", "even", "for", "from", "get", "got", "had", "has", "have", "her", "here",
    "him", "his", "how", "into", "its", "just", "like", "made", "make", "many", "more", "most",
    "much", "new", "not", "now", "off", "only", "other", "our", "out", "over", "own", "said",
    "same", "say", "says", "she", "should", "since", "some", "still", "such", "than", "that",
    "the", "their", "them", "then", "there", "these", "they", "this", "those", "through", "too",
    "under", "was", "way", "well", "were", "what", "when", "where", "which", "while", "who",
    "will", "with", "would", "you", "your",
];

const DEFAULT_MAX_FEATURES: usize = 1000;

/// Vocabulary + idf weights, fit once, then used to project arbitrary text
#[derive(Debug, Clone)]
pub struct VectorSpaceModel {
    /// Term to column index
    vocabulary: HashMap<String, usize>,
    /// Inverse-document-frequency weight per column
    idf: Vec<f32>,
    max_features: usize,
}

impl VectorSpaceModel {
    pub fn new() -> Self {
        Self::with_max_features(DEFAULT_MAX_FEATURES)
    }

    pub fn with_max_features(max_features: usize) -> Self {
        Self {
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            max_features,
        }
    }

    /// Fit vocabulary and idf weights over a document corpus
    ///
    /// The vocabulary keeps the `max_features` most frequent unigrams and
    /// bigrams (stop words excluded), ties broken alphabetically. Idf uses
    /// smoothed weighting: ln((1 + n) / (1 + df)) + 1.
    pub fn fit(&mut self, documents: &[String]) {
        let mut corpus_counts: HashMap<String, usize> = HashMap::new();
        let mut doc_frequency: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms = extract_terms(doc);
            let mut seen: HashSet<&str> = HashSet::new();
            for term in &terms {
                *corpus_counts.entry(term.clone()).or_insert(0) += 1;
                if seen.insert(term) {
                    *doc_frequency.entry(term.clone()).or_insert(0) += 1;
                }
            }
        }

        let mut ranked: Vec<(String, usize)> = corpus_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.max_features);

        let n_docs = documents.len() as f32;
        self.vocabulary.clear();
        self.idf.clear();
        for (column, (term, _)) in ranked.into_iter().enumerate() {
            let df = doc_frequency.get(&term).copied().unwrap_or(0) as f32;
            self.idf.push(((1.0 + n_docs) / (1.0 + df)).ln() + 1.0);
            self.vocabulary.insert(term, column);
        }
    }

    /// Whether `fit` has produced a usable vocabulary
    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    /// Dimensionality of embedded vectors
    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    /// Project text into the fitted vector space
    ///
    /// Term weights are tf·idf, l2-normalized. Terms outside the vocabulary
    /// are silently dropped; fully out-of-vocabulary text yields the zero
    /// vector.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.idf.len()];

        for term in extract_terms(text) {
            if let Some(&column) = self.vocabulary.get(&term) {
                vector[column] += self.idf[column];
            }
        }

        let norm = vector.iter().map(|w| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for w in &mut vector {
                *w /= norm;
            }
        }
        vector
    }
}

impl Default for VectorSpaceModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase word tokens of at least two characters, stop words removed
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
        .filter(|token| !STOP_WORDS.contains(token))
        .map(|token| token.to_string())
        .collect()
}

/// Unigrams plus adjacent bigrams over the token stream
fn extract_terms(text: &str) -> Vec<String> {
    let tokens = tokenize(text);
    let mut terms = tokens.clone();
    for pair in tokens.windows(2) {
        terms.push(format!("{} {}", pair[0], pair[1]));
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(docs: &[&str]) -> Vec<String> {
        docs.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_fit_builds_unigrams_and_bigrams() {
        let mut model = VectorSpaceModel::new();
        model.fit(&corpus(&["earthquake hits region", "earthquake relief effort"]));

        assert!(model.vocabulary.contains_key("earthquake"));
        assert!(model.vocabulary.contains_key("earthquake hits"));
        assert!(model.is_fitted());
        assert_eq!(model.dimension(), model.idf.len());
    }

    #[test]
    fn test_stop_words_excluded() {
        let mut model = VectorSpaceModel::new();
        model.fit(&corpus(&["the minister said that the vote was close"]));

        assert!(!model.vocabulary.contains_key("the"));
        assert!(!model.vocabulary.contains_key("that"));
        assert!(model.vocabulary.contains_key("minister"));
        assert!(model.vocabulary.contains_key("vote"));
    }

    #[test]
    fn test_vocabulary_cap() {
        let docs: Vec<String> = (0..50)
            .map(|i| format!("storm{} flood{} damage{}", i, i, i))
            .collect();
        let mut model = VectorSpaceModel::with_max_features(10);
        model.fit(&docs);

        assert_eq!(model.dimension(), 10);
    }

    #[test]
    fn test_embed_is_normalized() {
        let mut model = VectorSpaceModel::new();
        model.fit(&corpus(&["election results announced", "storm warning issued"]));

        let vector = model.embed("election results announced today");
        let norm: f32 = vector.iter().map(|w| w * w).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_out_of_vocabulary_is_zero_vector() {
        let mut model = VectorSpaceModel::new();
        model.fit(&corpus(&["election results announced"]));

        let vector = model.embed("volcano eruption evacuations");
        assert_eq!(vector.len(), model.dimension());
        assert!(vector.iter().all(|w| *w == 0.0));
    }

    #[test]
    fn test_unfitted_model_embeds_empty() {
        let model = VectorSpaceModel::new();
        assert!(!model.is_fitted());
        assert!(model.embed("anything at all").is_empty());
    }
}
