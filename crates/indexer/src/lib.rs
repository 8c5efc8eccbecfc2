//! # Pixseek Indexer
//!
//! Offline index construction for the image similarity engine.
//!
//! ## Pipeline
//!
//! ```text
//! Collection directory
//!     │
//!     ├──> ImageScanner (recursive, extension-filtered)
//!     │      └─> image files, sorted
//!     │
//!     ├──> FeatureExtractor (black-box image -> unit vector)
//!     │      └─> per-file failures skipped, not fatal
//!     │
//!     └──> VectorStore save/append
//!            └─> persisted (identifier, vector) snapshot
//! ```
//!
//! The extraction model itself is external; [`HashExtractor`] is the
//! shipped deterministic stand-in for tests and model-free runs.

mod error;
mod extractor;
mod indexer;
mod scanner;
mod stats;

pub use error::{IndexerError, Result};
pub use extractor::{BatchExtraction, FeatureExtractor, HashExtractor, DEFAULT_STUB_DIMENSION};
pub use indexer::ImageIndexer;
pub use scanner::ImageScanner;
pub use stats::IndexStats;
