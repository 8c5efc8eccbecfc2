use crate::error::{Result, SearchError};
use pixseek_vector_store::l2_norm;

/// Cosine similarity between two vectors of equal length.
///
/// Both sides are expected pre-normalized (the similarity then reduces
/// to a dot product), but the norms are recomputed here so a
/// non-normalized input still scores correctly. A zero-norm vector has
/// undefined similarity and is rejected.
pub fn cosine_similarity(query: &[f32], candidate: &[f32]) -> Result<f32> {
    debug_assert_eq!(query.len(), candidate.len());

    let dot: f32 = query.iter().zip(candidate).map(|(a, b)| a * b).sum();
    let norms = l2_norm(query) * l2_norm(candidate);
    if norms == 0.0 {
        return Err(SearchError::InvalidVector);
    }
    Ok(dot / norms)
}
