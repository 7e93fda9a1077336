//! TF-IDF text vectors
//!
//! Each pool item contributes one document (its track titles and artists).
//! The vocabulary is fit once over the whole corpus and reused for every
//! document, including unseen query documents.

use crate::error::{Error, Result};
use crate::vector::SparseVector;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

/// Default vocabulary cap
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// English stop words
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "doing", "done",
    "down", "due", "during", "each", "either", "else", "elsewhere", "enough", "etc", "even",
    "ever", "every", "everyone", "everything", "everywhere", "except", "few", "for", "former",
    "formerly", "from", "further", "get", "give", "go", "got", "had", "has", "have", "having",
    "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hers", "herself", "him",
    "himself", "his", "how", "however", "i", "ie", "if", "in", "indeed", "into", "is", "it",
    "its", "itself", "just", "keep", "last", "latter", "least", "less", "made", "make", "many",
    "may", "me", "meanwhile", "might", "more", "moreover", "most", "mostly", "much", "must",
    "my", "myself", "namely", "neither", "never", "nevertheless", "next", "no", "nobody",
    "none", "noone", "nor", "not", "nothing", "now", "nowhere", "of", "off", "often", "on",
    "once", "one", "only", "onto", "or", "other", "others", "otherwise", "our", "ours",
    "ourselves", "out", "over", "own", "per", "perhaps", "please", "rather", "re", "same",
    "see", "seem", "seemed", "seeming", "seems", "several", "she", "should", "since", "so",
    "some", "somehow", "someone", "something", "sometime", "sometimes", "somewhere", "still",
    "such", "take", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "thence", "there", "thereafter", "thereby", "therefore", "therein", "thereupon", "these",
    "they", "this", "those", "though", "through", "throughout", "thru", "thus", "to",
    "together", "too", "toward", "towards", "under", "until", "up", "upon", "us", "very", "via",
    "was", "we", "well", "were", "what", "whatever", "when", "whence", "whenever", "where",
    "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever", "whether", "which",
    "while", "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within",
    "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// Lowercase, split on anything non-alphanumeric, keep tokens of two or more characters
#[inline]
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| s.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

/// TF-IDF settings; `fit` produces an immutable [`FittedTfidf`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TfidfVectorizer {
    pub max_features: usize,
    #[serde(default = "default_stop_words")]
    pub stop_words_english: bool,
}

fn default_stop_words() -> bool {
    true
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            stop_words_english: true,
        }
    }
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_stop_words_english(mut self, enable: bool) -> Self {
        self.stop_words_english = enable;
        self
    }

    fn terms(&self, document: &str, stop_words: &AHashSet<&str>) -> Vec<String> {
        tokenize(document)
            .into_iter()
            .filter(|t| !stop_words.contains(t.as_str()))
            .collect()
    }

    fn stop_words(&self) -> AHashSet<&'static str> {
        if self.stop_words_english {
            ENGLISH_STOP_WORDS.iter().copied().collect()
        } else {
            AHashSet::new()
        }
    }

    /// Learn vocabulary and idf weights from `documents`.
    ///
    /// When more distinct terms survive than `max_features`, the most frequent
    /// terms across the corpus are kept; ties go to the lexically smaller term.
    pub fn fit<S: AsRef<str>>(&self, documents: &[S]) -> Result<FittedTfidf> {
        if documents.is_empty() {
            return Err(Error::MissingInput("text corpus is empty".to_string()));
        }
        if self.max_features == 0 {
            return Err(Error::InvalidConfig("max_features must be positive".to_string()));
        }

        let stop_words = self.stop_words();
        let mut corpus_tf: AHashMap<String, u64> = AHashMap::new();
        let mut doc_freq: AHashMap<String, u64> = AHashMap::new();

        for document in documents {
            let terms = self.terms(document.as_ref(), &stop_words);
            let mut seen: AHashSet<&str> = AHashSet::new();
            for term in &terms {
                *corpus_tf.entry(term.clone()).or_insert(0) += 1;
                if seen.insert(term.as_str()) {
                    *doc_freq.entry(term.clone()).or_insert(0) += 1;
                }
            }
        }

        let mut ranked: Vec<(String, u64)> = corpus_tf.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.max_features);

        let mut vocabulary: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        vocabulary.sort();

        let n = documents.len() as f32;
        let idf = vocabulary
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0) as f32;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        let index = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i as u32))
            .collect();

        tracing::debug!(
            documents = documents.len(),
            vocabulary = vocabulary.len(),
            "fitted tf-idf vocabulary"
        );

        Ok(FittedTfidf {
            settings: self.clone(),
            vocabulary,
            index,
            idf,
        })
    }
}

/// Vocabulary and idf weights learned from a corpus
#[derive(Debug, Clone)]
pub struct FittedTfidf {
    settings: TfidfVectorizer,
    vocabulary: Vec<String>,
    index: AHashMap<String, u32>,
    idf: Vec<f32>,
}

impl FittedTfidf {
    /// Vocabulary terms in column order (lexical)
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn idf(&self) -> &[f32] {
        &self.idf
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.vocabulary.len()
    }

    /// L2-normalized TF-IDF row for one document; out-of-vocabulary terms are ignored
    pub fn transform(&self, document: &str) -> SparseVector {
        let stop_words = self.settings.stop_words();
        let mut counts: AHashMap<u32, f32> = AHashMap::new();
        for term in self.settings.terms(document, &stop_words) {
            if let Some(&col) = self.index.get(&term) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let mut pairs: Vec<(u32, f32)> = counts
            .into_iter()
            .map(|(col, tf)| (col, tf * self.idf[col as usize]))
            .collect();
        // column order keeps the norm bit-identical across runs
        pairs.sort_by_key(|(col, _)| *col);
        let norm = pairs.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut pairs {
                *w /= norm;
            }
        }
        SparseVector::from_pairs(self.dim(), pairs)
    }

    pub fn transform_all<S: AsRef<str>>(&self, documents: &[S]) -> Vec<SparseVector> {
        documents.iter().map(|d| self.transform(d.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Embedding;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("Don't Stop Me-Now (Remastered 2011) a"),
            vec!["don", "stop", "me", "now", "remastered", "2011"]
        );
    }

    #[test]
    fn test_stop_words_are_excluded_from_vocabulary() {
        let fitted = TfidfVectorizer::default()
            .fit(&["the river and the sea", "river of dreams"])
            .unwrap();
        assert_eq!(fitted.vocabulary(), &["dreams", "river", "sea"]);
    }

    #[test]
    fn test_stop_words_disabled() {
        let fitted = TfidfVectorizer::default()
            .with_stop_words_english(false)
            .fit(&["the sea"])
            .unwrap();
        assert_eq!(fitted.vocabulary(), &["sea", "the"]);
    }

    #[test]
    fn test_vocabulary_cap_by_frequency_then_lexical() {
        let docs = ["zulu zulu alpha", "bravo alpha", "charlie zulu delta"];
        let fitted = TfidfVectorizer::new(3).fit(&docs).unwrap();
        // zulu=3, alpha=2, then bravo/charlie/delta tie at 1 and bravo wins lexically
        assert_eq!(fitted.vocabulary(), &["alpha", "bravo", "zulu"]);

        let again = TfidfVectorizer::new(3).fit(&docs).unwrap();
        assert_eq!(fitted.vocabulary(), again.vocabulary());
        assert_eq!(fitted.idf(), again.idf());
    }

    #[test]
    fn test_smoothed_idf() {
        let fitted = TfidfVectorizer::default().fit(&["jazz piano", "jazz"]).unwrap();
        // jazz appears everywhere: ln(3/3) + 1
        assert!((fitted.idf()[0] - 1.0).abs() < 1e-6);
        // piano appears once: ln(3/2) + 1
        assert!((fitted.idf()[1] - ((3.0f32 / 2.0).ln() + 1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let fitted = TfidfVectorizer::default()
            .fit(&["midnight city lights", "city of stars"])
            .unwrap();
        let row = fitted.transform("midnight city");
        assert!((row.norm() - 1.0).abs() < 1e-5);
        assert_eq!(row.dim(), fitted.dim());
    }

    #[test]
    fn test_unseen_and_empty_documents_are_zero() {
        let fitted = TfidfVectorizer::default().fit(&["blue monday"]).unwrap();
        assert_eq!(fitted.transform("completely unrelated").nnz(), 0);
        assert_eq!(fitted.transform("").nnz(), 0);
        assert_eq!(fitted.transform("the and of").nnz(), 0);
    }

    #[test]
    fn test_empty_corpus_is_missing_input() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            TfidfVectorizer::default().fit(&empty),
            Err(Error::MissingInput(_))
        ));
    }

    #[test]
    fn test_all_stop_word_corpus_fits_empty_vocabulary() {
        let fitted = TfidfVectorizer::default().fit(&["the a of", ""]).unwrap();
        assert_eq!(fitted.dim(), 0);
        assert_eq!(fitted.transform("anything").nnz(), 0);
    }
}
