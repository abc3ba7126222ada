//! Text feature extraction
//!
//! Turns raw messages into sparse TF-IDF vectors.

pub mod sparse;
pub mod stop_words;
pub mod tfidf;

pub use sparse::SparseVector;
pub use tfidf::{TfidfParams, TfidfVectorizer};
