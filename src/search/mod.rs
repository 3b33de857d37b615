//! Similarity search over the course catalog.
//!
//! - **tfidf**: vocabulary, IDF weights and sparse document vectors
//! - **ranker**: cosine ranking with post-ranking program filtering

pub mod ranker;
pub mod tfidf;

pub use ranker::{rank, search, SearchHit, SearchOptions, DEFAULT_FETCH_MULTIPLIER};
pub use tfidf::{tokenize, SparseVec, VectorSpace};
