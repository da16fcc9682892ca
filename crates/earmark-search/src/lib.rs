//! Similarity search for earmark.
//!
//! Fits a TF-IDF representation over catalog descriptions and ranks entries
//! by cosine similarity against a query entry.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod context;
pub mod matrix;
pub mod rank;
pub mod stopwords;
pub mod tokenize;
pub mod vectorize;

pub use context::{RecommenderContext, SharedContext};
pub use matrix::{FeatureMatrix, SparseVector};
pub use rank::{HiddenGems, Query, Recommendation, RecommendationResult};
pub use tokenize::Tokenizer;
pub use vectorize::{TfidfVectorizer, Vocabulary};
