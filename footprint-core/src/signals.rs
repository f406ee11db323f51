//! Identity signals derived from profile excerpts
//!
//! Two families of signals are computed from the text gathered on
//! deep-analysis platforms:
//! - Lexical stylometry over the concatenated text (vocabulary richness,
//!   sentence length, complexity and consistency tiers)
//! - Cross-profile similarity: mean pairwise cosine of TF-IDF vectors
//!
//! [`compute`] is a pure function of its input. Term maps are ordered so
//! floating point accumulation happens in the same order on every call.

use regex::Regex;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

/// Sentence length below which writing is Simple
pub const SIMPLE_SENTENCE_LIMIT: f64 = 12.0;

/// Sentence length from which writing is Complex
pub const COMPLEX_SENTENCE_LIMIT: f64 = 22.0;

/// Vocabulary richness that must be exceeded to count as Consistent
pub const CONSISTENCY_RICHNESS: f64 = 0.4;

static WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").unwrap());

// Terms of at least two word characters, as used for TF-IDF
static TERM_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of",
    "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own",
    "same", "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs",
    "them", "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

static STOP_WORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

/// Writing complexity derived from mean sentence length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityTier {
    Simple,
    Medium,
    Complex,
    /// No text to measure
    Unknown,
}

impl ComplexityTier {
    /// Bands are `[0, 12)`, `[12, 22)`, `[22, ∞)`
    pub fn from_sentence_length(average: f64) -> Self {
        if average < SIMPLE_SENTENCE_LIMIT {
            Self::Simple
        } else if average < COMPLEX_SENTENCE_LIMIT {
            Self::Medium
        } else {
            Self::Complex
        }
    }
}

impl fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Simple => "Simple",
            Self::Medium => "Medium",
            Self::Complex => "Complex",
            Self::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// Writing consistency derived from vocabulary richness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyTier {
    Consistent,
    Variable,
    InsufficientData,
}

impl ConsistencyTier {
    pub fn from_richness(richness: f64) -> Self {
        if richness > CONSISTENCY_RICHNESS {
            Self::Consistent
        } else {
            Self::Variable
        }
    }
}

impl fmt::Display for ConsistencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Consistent => "Consistent",
            Self::Variable => "Variable",
            Self::InsufficientData => "Insufficient data",
        };
        f.write_str(label)
    }
}

/// Register of the writing. Only measured text earns a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationStyle {
    TechnicalInformational,
    Unknown,
}

impl fmt::Display for CommunicationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TechnicalInformational => "Technical / Informational",
            Self::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// Similarity across profiles, distinct from a measured zero
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrossProfileSimilarity {
    /// Fewer than two excerpts
    NotComputable,
    Measured(f64),
}

impl CrossProfileSimilarity {
    pub fn is_computable(&self) -> bool {
        matches!(self, Self::Measured(_))
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Measured(score) => Some(*score),
            Self::NotComputable => None,
        }
    }
}

/// Signals computed fresh for every query
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSet {
    /// Distinct tokens / total tokens, in [0, 1]
    pub vocabulary_richness: f64,
    /// Mean word count over non-empty sentence fragments
    pub average_sentence_length: f64,
    pub complexity_tier: ComplexityTier,
    pub consistency_tier: ConsistencyTier,
    pub communication_style: CommunicationStyle,
    pub cross_profile_similarity: CrossProfileSimilarity,
    /// Number of non-empty excerpts the signals were computed from
    pub excerpt_count: usize,
}

impl SignalSet {
    /// Signals for an empty excerpt set
    pub fn insufficient() -> Self {
        Self {
            vocabulary_richness: 0.0,
            average_sentence_length: 0.0,
            complexity_tier: ComplexityTier::Unknown,
            consistency_tier: ConsistencyTier::InsufficientData,
            communication_style: CommunicationStyle::Unknown,
            cross_profile_similarity: CrossProfileSimilarity::NotComputable,
            excerpt_count: 0,
        }
    }
}

impl Serialize for SignalSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SignalSet", 8)?;
        state.serialize_field("vocabulary_richness", &self.vocabulary_richness)?;
        state.serialize_field("average_sentence_length", &self.average_sentence_length)?;
        state.serialize_field("complexity_tier", &self.complexity_tier)?;
        state.serialize_field("consistency_tier", &self.consistency_tier)?;
        state.serialize_field("communication_style", &self.communication_style)?;
        state.serialize_field(
            "cross_profile_similarity",
            &self.cross_profile_similarity.value(),
        )?;
        state.serialize_field(
            "similarity_computable",
            &self.cross_profile_similarity.is_computable(),
        )?;
        state.serialize_field("excerpt_count", &self.excerpt_count)?;
        state.end()
    }
}

/// Compute the signal set for a sequence of excerpts
pub fn compute<S: AsRef<str>>(excerpts: &[S]) -> SignalSet {
    let texts: Vec<&str> = excerpts
        .iter()
        .map(|excerpt| excerpt.as_ref())
        .filter(|text| !text.trim().is_empty())
        .collect();

    if texts.is_empty() {
        return SignalSet::insufficient();
    }

    let cross_profile_similarity = if texts.len() >= 2 {
        CrossProfileSimilarity::Measured(mean_pairwise_similarity(&texts))
    } else {
        CrossProfileSimilarity::NotComputable
    };

    let combined = texts.join(" ");
    let Some((vocabulary_richness, average_sentence_length)) = stylometry(&combined) else {
        // Punctuation-only text: nothing to measure lexically
        return SignalSet {
            cross_profile_similarity,
            excerpt_count: texts.len(),
            ..SignalSet::insufficient()
        };
    };

    SignalSet {
        vocabulary_richness,
        average_sentence_length,
        complexity_tier: ComplexityTier::from_sentence_length(average_sentence_length),
        consistency_tier: ConsistencyTier::from_richness(vocabulary_richness),
        communication_style: CommunicationStyle::TechnicalInformational,
        cross_profile_similarity,
        excerpt_count: texts.len(),
    }
}

/// Returns (vocabulary richness, mean sentence length), or None without words
fn stylometry(text: &str) -> Option<(f64, f64)> {
    let words: Vec<&str> = WORD_REGEX.find_iter(text).map(|m| m.as_str()).collect();
    if words.is_empty() {
        return None;
    }

    let distinct: HashSet<&str> = words.iter().copied().collect();
    let richness = distinct.len() as f64 / words.len() as f64;

    let lengths: Vec<usize> = text
        .split(SENTENCE_TERMINATORS)
        .filter(|fragment| !fragment.trim().is_empty())
        .map(|fragment| fragment.split_whitespace().count())
        .collect();

    let average = if lengths.is_empty() {
        0.0
    } else {
        lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
    };

    Some((richness, average))
}

type TermVector = BTreeMap<String, f64>;

fn term_counts(text: &str) -> BTreeMap<String, f64> {
    let mut counts = BTreeMap::new();
    for m in TERM_REGEX.find_iter(text) {
        let term = m.as_str().to_lowercase();
        if STOP_WORD_SET.contains(term.as_str()) {
            continue;
        }
        *counts.entry(term).or_insert(0.0) += 1.0;
    }
    counts
}

/// L2-normalised TF-IDF vectors with smoothed IDF
fn tfidf_vectors(texts: &[&str]) -> Vec<TermVector> {
    let counts: Vec<BTreeMap<String, f64>> = texts.iter().map(|t| term_counts(t)).collect();

    let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
    for doc in &counts {
        for term in doc.keys() {
            *document_frequency.entry(term.as_str()).or_insert(0) += 1;
        }
    }

    let n = counts.len() as f64;
    counts
        .iter()
        .map(|doc| {
            let mut vector: TermVector = doc
                .iter()
                .map(|(term, tf)| {
                    let df = document_frequency[term.as_str()] as f64;
                    let idf = ((1.0 + n) / (1.0 + df)).ln() + 1.0;
                    (term.clone(), tf * idf)
                })
                .collect();

            let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for weight in vector.values_mut() {
                    *weight /= norm;
                }
            }
            vector
        })
        .collect()
}

fn cosine(a: &TermVector, b: &TermVector) -> f64 {
    a.iter()
        .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
        .sum()
}

fn mean_pairwise_similarity(texts: &[&str]) -> f64 {
    let vectors = tfidf_vectors(texts);
    let mut total = 0.0;
    let mut pairs = 0usize;

    for i in 0..vectors.len() {
        for j in (i + 1)..vectors.len() {
            total += cosine(&vectors[i], &vectors[j]);
            pairs += 1;
        }
    }

    if pairs == 0 {
        return 0.0;
    }
    (total / pairs as f64).clamp(0.0, 1.0)
}
