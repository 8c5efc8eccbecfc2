//! # Pixseek Search
//!
//! Exact cosine-similarity ranking over an image feature index.
//!
//! ## Pipeline
//!
//! ```text
//! probe vector
//!     │
//!     ├──> SimilarityEngine (snapshot handle)
//!     │      └─> exhaustive cosine scan, O(N·D)
//!     │
//!     └──> top-K hits, descending score
//!            └─> exact-match flag per EngineConfig threshold
//! ```
//!
//! No approximate indexing: every query scores every entry. The
//! snapshot backing live queries is immutable; rebuilds install a new
//! one atomically.

mod config;
mod engine;
mod error;
mod rank;
mod similarity;

pub use config::{EngineConfig, DEFAULT_EXACT_MATCH_THRESHOLD, DEFAULT_TOP_K};
pub use engine::{EngineStatus, RankedMatch, SimilarityEngine};
pub use error::{Result, SearchError};
pub use rank::{search, search_by_identifier, SearchHit};
pub use similarity::cosine_similarity;
