use crate::error::{Result, SearchError};
use crate::similarity::cosine_similarity;
use pixseek_vector_store::IndexSnapshot;
use serde::Serialize;

/// One ranked result: an indexed identifier and its cosine score
/// against the query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub identifier: String,
    pub score: f32,
}

/// Score every snapshot entry against `query` and return the `top_k`
/// best, descending.
///
/// Exhaustive O(N·D) scan; no index structure. Ties preserve snapshot
/// insertion order (stable sort). `top_k` is clamped to the entry
/// count, so asking for more than N returns all N.
pub fn search(query: &[f32], snapshot: &IndexSnapshot, top_k: usize) -> Result<Vec<SearchHit>> {
    if snapshot.is_empty() {
        return Err(SearchError::EmptyIndex);
    }
    let dim = snapshot.dimension().unwrap_or(0);
    if query.len() != dim {
        return Err(SearchError::DimensionMismatch {
            expected: dim,
            actual: query.len(),
        });
    }

    let mut hits = Vec::with_capacity(snapshot.len());
    for entry in &snapshot.entries {
        hits.push(SearchHit {
            identifier: entry.identifier.clone(),
            score: cosine_similarity(query, &entry.vector)?,
        });
    }

    // sort_by is stable: equal scores keep insertion order.
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(top_k.min(snapshot.len()));
    log::debug!("Ranked {} entries, returning {}", snapshot.len(), hits.len());
    Ok(hits)
}

/// Rank neighbors of an already-indexed image, excluding the image
/// itself from its own results.
///
/// Looks up `identifier` (`NotFound` when absent), searches with
/// `top_k + 1`, drops the self-hit, truncates to `top_k`.
pub fn search_by_identifier(
    identifier: &str,
    snapshot: &IndexSnapshot,
    top_k: usize,
) -> Result<Vec<SearchHit>> {
    let position = snapshot
        .position_of(identifier)
        .ok_or_else(|| SearchError::NotFound(identifier.to_string()))?;
    let query = &snapshot.entries[position].vector;

    let mut hits = search(query, snapshot, top_k.saturating_add(1))?;
    hits.retain(|hit| hit.identifier != identifier);
    hits.truncate(top_k);
    Ok(hits)
}
