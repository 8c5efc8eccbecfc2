use serde::{Deserialize, Serialize};

/// Tolerance used when checking that a vector has unit Euclidean norm.
pub const UNIT_NORM_TOLERANCE: f32 = 1e-6;

/// Fixed-length feature embedding of a single image.
///
/// Produced by an external extraction backend and expected to be
/// L2-normalized. The dimension is constant for the lifetime of an
/// index.
pub type FeatureVector = Vec<f32>;

/// One indexed image: an opaque identifier paired with its feature
/// vector. Identifiers are unique within a store; entry order is
/// insertion order and defines result tie-break order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub identifier: String,
    pub vector: FeatureVector,
}

/// A fully-loaded, immutable view of the index at a point in time.
///
/// Owned by [`crate::VectorStore`]; query code only borrows it and
/// never mutates it.
#[derive(Debug, Clone, Default)]
pub struct IndexSnapshot {
    pub entries: Vec<IndexEntry>,
    pub ready: bool,
}

impl IndexSnapshot {
    pub fn new(entries: Vec<IndexEntry>) -> Self {
        Self {
            entries,
            ready: true,
        }
    }

    /// Empty, not-yet-loaded snapshot.
    pub fn not_ready() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vector dimension of this snapshot, or `None` when empty.
    pub fn dimension(&self) -> Option<usize> {
        self.entries.first().map(|e| e.vector.len())
    }

    /// Position of `identifier` in insertion order.
    pub fn position_of(&self, identifier: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.identifier == identifier)
    }
}

/// Euclidean (L2) norm.
pub fn l2_norm(vector: &[f32]) -> f32 {
    vector.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Scale `vector` to unit norm in place. Zero vectors are left
/// untouched; callers that care reject them separately.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = l2_norm(vector);
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}
