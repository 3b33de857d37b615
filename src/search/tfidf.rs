//! Pure-Rust TF-IDF vector space over course records.
//!
//! Raw term frequency, smooth IDF `ln((1 + n) / (1 + df)) + 1`, unigram + bigram
//! tokenization over runs of two or more word characters, and L2-normalized
//! sparse vectors. These are the scikit-learn `TfidfVectorizer` defaults, so
//! scores line up with catalogs prepared in that ecosystem.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid regex"));

/// Sparse vector: parallel arrays of column indices (ascending) and values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVec {
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl SparseVec {
    /// Column indices, sorted ascending.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Weights, parallel to [`indices`](Self::indices).
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of non-zero dimensions.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn dot(&self, other: &SparseVec) -> f32 {
        let mut sum = 0.0f32;
        let (mut i, mut j) = (0, 0);
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
            }
        }
        sum
    }

    pub fn norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Cosine similarity in `[0, 1]` for non-negative vectors.
    ///
    /// A zero vector on either side scores `0.0`.
    pub fn cosine(&self, other: &SparseVec) -> f32 {
        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            return 0.0;
        }
        (self.dot(other) / denom).clamp(0.0, 1.0)
    }

    fn l2_normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for v in &mut self.values {
                *v /= norm;
            }
        }
    }
}

/// Frozen TF-IDF model: vocabulary, IDF weights and one vector per document.
///
/// Built once from the catalog corpus. There is no way to add documents or
/// terms afterwards; a refreshed catalog builds a new space.
#[derive(Debug, Clone, Default)]
pub struct VectorSpace {
    terms: Vec<String>,
    vocab: HashMap<String, u32>,
    idf: Vec<f32>,
    doc_vectors: Vec<SparseVec>,
}

impl VectorSpace {
    /// Fit the vocabulary and document vectors from a corpus.
    ///
    /// Terms are indexed in lexicographic order, so an identical corpus always
    /// yields an identical space.
    pub fn build<S: AsRef<str> + Sync>(corpus: &[S]) -> Self {
        let tokenized: Vec<Vec<String>> = corpus
            .par_iter()
            .map(|doc| tokenize(doc.as_ref()))
            .collect();

        let mut df: BTreeMap<&str, u32> = BTreeMap::new();
        for tokens in &tokenized {
            let unique: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let n = corpus.len() as f32;
        let mut terms = Vec::with_capacity(df.len());
        let mut idf = Vec::with_capacity(df.len());
        for (term, doc_freq) in df {
            terms.push(term.to_string());
            idf.push(((1.0 + n) / (1.0 + doc_freq as f32)).ln() + 1.0);
        }

        let vocab: HashMap<String, u32> = terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx as u32))
            .collect();

        let doc_vectors: Vec<SparseVec> = tokenized
            .par_iter()
            .map(|tokens| weigh(tokens, &vocab, &idf))
            .collect();

        tracing::debug!(
            documents = doc_vectors.len(),
            terms = terms.len(),
            "built tf-idf vector space"
        );

        Self {
            terms,
            vocab,
            idf,
            doc_vectors,
        }
    }

    /// Project arbitrary text into this space. Unknown tokens are dropped.
    pub fn transform(&self, text: &str) -> SparseVec {
        weigh(&tokenize(text), &self.vocab, &self.idf)
    }

    /// Vocabulary in index order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn index_of(&self, term: &str) -> Option<u32> {
        self.vocab.get(term).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.index_of(term).map(|idx| self.idf[idx as usize])
    }

    /// Per-document vectors, in corpus order.
    pub fn doc_vectors(&self) -> &[SparseVec] {
        &self.doc_vectors
    }

    pub fn vocabulary_len(&self) -> usize {
        self.terms.len()
    }

    pub fn document_count(&self) -> usize {
        self.doc_vectors.len()
    }
}

/// Tokenize text into lowercase unigrams + bigrams.
///
/// Single-character words are dropped before bigrams are formed.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = TOKEN_RE.find_iter(&lowered).map(|m| m.as_str()).collect();

    let mut tokens: Vec<String> = words.iter().map(|w| (*w).to_string()).collect();
    for pair in words.windows(2) {
        tokens.push(format!("{} {}", pair[0], pair[1]));
    }
    tokens
}

/// Build an L2-normalized TF-IDF vector from tokens.
fn weigh(tokens: &[String], vocab: &HashMap<String, u32>, idf: &[f32]) -> SparseVec {
    let mut tf: BTreeMap<u32, u32> = BTreeMap::new();
    for token in tokens {
        if let Some(&idx) = vocab.get(token) {
            *tf.entry(idx).or_insert(0) += 1;
        }
    }

    let (indices, values) = tf
        .into_iter()
        .map(|(idx, count)| (idx, count as f32 * idf[idx as usize]))
        .unzip();

    let mut vec = SparseVec { indices, values };
    vec.l2_normalize();
    vec
}
