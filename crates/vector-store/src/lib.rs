//! # Pixseek Vector Store
//!
//! Durable storage for the image feature index: an ordered table of
//! (identifier, feature vector) pairs with load, save, and append.
//!
//! ## Layout
//!
//! ```text
//! <store dir>/
//!     manifest.json            commit point (generation, count, dim)
//!     vectors-<gen>.bin        binary vector table (see format.rs)
//!     identifiers-<gen>.json   positionally aligned identifier list
//! ```
//!
//! Save writes the next generation's artifact pair first and swaps
//! `manifest.json` into place last (tmp + rename), so a crash mid-save
//! never leaves a mismatched pair readable.
//!
//! ## Example
//!
//! ```no_run
//! use pixseek_vector_store::VectorStore;
//!
//! #[tokio::main]
//! async fn main() -> pixseek_vector_store::Result<()> {
//!     let mut store = VectorStore::new(".pixseek");
//!     store.save(
//!         vec![vec![1.0, 0.0], vec![0.0, 1.0]],
//!         vec!["a.jpg".into(), "b.jpg".into()],
//!     )
//!     .await?;
//!
//!     let snapshot = store.load().await?;
//!     println!("{} images indexed", snapshot.len());
//!     Ok(())
//! }
//! ```

mod error;
mod format;
mod store;
mod types;

pub mod paths;

pub use error::{Result, VectorStoreError};
pub use format::{FORMAT_VERSION, MAGIC};
pub use store::{Manifest, VectorStore};
pub use types::{
    l2_norm, l2_normalize, FeatureVector, IndexEntry, IndexSnapshot, UNIT_NORM_TOLERANCE,
};
