use crate::config::EngineConfig;
use crate::error::{Result, SearchError};
use crate::rank;
use pixseek_vector_store::{IndexSnapshot, VectorStore};
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// A ranked result as surfaced at the boundary: identifier, score,
/// and whether the score clears the configured exact-match threshold.
#[derive(Debug, Clone, Serialize)]
pub struct RankedMatch {
    pub identifier: String,
    pub score: f32,
    pub is_exact_match: bool,
}

/// Health summary for status endpoints.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EngineStatus {
    pub ready: bool,
    pub count: usize,
}

/// Long-lived query handle over an immutable index snapshot.
///
/// Constructed once at startup and passed by reference to callers; no
/// process-wide singletons. Concurrent queries share the current
/// `Arc<IndexSnapshot>` without coordination; a rebuild installs a new
/// snapshot wholesale under the single write lock, so a reader sees
/// either the fully-old or fully-new index, never a partial one.
/// Concurrent rebuilds are not coordinated: the last install wins.
pub struct SimilarityEngine {
    snapshot: RwLock<Arc<IndexSnapshot>>,
    config: EngineConfig,
}

impl SimilarityEngine {
    /// Build an engine over an already-materialized snapshot.
    pub fn with_snapshot(snapshot: IndexSnapshot, config: EngineConfig) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(snapshot)),
            config,
        }
    }

    /// Attempt to load the persisted index from `store_dir`.
    ///
    /// Never fails the process: when no index is present (or it is
    /// corrupt) the engine starts with `ready = false` and reports
    /// `NotReady` per query until a snapshot is installed.
    pub async fn initialize(store_dir: impl AsRef<Path>, config: EngineConfig) -> Self {
        let mut store = VectorStore::new(store_dir.as_ref());
        let snapshot = match store.load().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!(
                    "Starting without an index ({e}); queries will report not-ready"
                );
                IndexSnapshot::not_ready()
            }
        };
        Self::with_snapshot(snapshot, config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current snapshot reference. Cheap; used once per query.
    fn current(&self) -> Arc<IndexSnapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the live snapshot. The handoff is atomic from a
    /// reader's perspective.
    pub fn install(&self, snapshot: IndexSnapshot) {
        let count = snapshot.len();
        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(snapshot);
        log::info!("Installed index snapshot with {count} entries");
    }

    /// Hot path: rank the index against a probe feature vector.
    pub fn query(&self, vector: &[f32], top_k: Option<usize>) -> Result<Vec<RankedMatch>> {
        let snapshot = self.current();
        if !snapshot.ready {
            return Err(SearchError::NotReady);
        }
        let top_k = top_k.unwrap_or(self.config.default_top_k);
        let hits = rank::search(vector, &snapshot, top_k)?;
        Ok(self.stamp(hits))
    }

    /// Rank neighbors of an image already in the index; the image
    /// never appears in its own results.
    pub fn query_by_identifier(
        &self,
        identifier: &str,
        top_k: Option<usize>,
    ) -> Result<Vec<RankedMatch>> {
        let snapshot = self.current();
        if !snapshot.ready {
            return Err(SearchError::NotReady);
        }
        let top_k = top_k.unwrap_or(self.config.default_top_k);
        let hits = rank::search_by_identifier(identifier, &snapshot, top_k)?;
        Ok(self.stamp(hits))
    }

    pub fn status(&self) -> EngineStatus {
        let snapshot = self.current();
        EngineStatus {
            ready: snapshot.ready,
            count: snapshot.len(),
        }
    }

    fn stamp(&self, hits: Vec<rank::SearchHit>) -> Vec<RankedMatch> {
        hits.into_iter()
            .map(|hit| RankedMatch {
                is_exact_match: hit.score > self.config.exact_match_threshold,
                identifier: hit.identifier,
                score: hit.score,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixseek_vector_store::IndexEntry;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn snapshot() -> IndexSnapshot {
        IndexSnapshot::new(vec![
            IndexEntry {
                identifier: "a.jpg".into(),
                vector: vec![1.0, 0.0],
            },
            IndexEntry {
                identifier: "b.jpg".into(),
                vector: vec![0.0, 1.0],
            },
        ])
    }

    #[tokio::test]
    async fn initialize_without_index_is_not_ready() {
        let temp = TempDir::new().unwrap();
        let engine =
            SimilarityEngine::initialize(temp.path().join("missing"), EngineConfig::default())
                .await;

        let status = engine.status();
        assert!(!status.ready);
        assert_eq!(status.count, 0);
        assert!(matches!(
            engine.query(&[1.0, 0.0], None),
            Err(SearchError::NotReady)
        ));
    }

    #[tokio::test]
    async fn initialize_over_saved_store_is_ready() {
        let temp = TempDir::new().unwrap();
        let mut store = VectorStore::new(temp.path());
        store
            .save(
                vec![vec![1.0, 0.0], vec![0.0, 1.0]],
                vec!["a.jpg".into(), "b.jpg".into()],
            )
            .await
            .unwrap();

        let engine = SimilarityEngine::initialize(temp.path(), EngineConfig::default()).await;
        let status = engine.status();
        assert!(status.ready);
        assert_eq!(status.count, 2);

        let matches = engine.query(&[1.0, 0.0], Some(1)).unwrap();
        assert_eq!(matches[0].identifier, "a.jpg");
        assert!(matches[0].is_exact_match);
    }

    #[test]
    fn install_swaps_the_snapshot_wholesale() {
        let engine = SimilarityEngine::with_snapshot(
            IndexSnapshot::not_ready(),
            EngineConfig::default(),
        );
        assert!(!engine.status().ready);

        engine.install(snapshot());
        let status = engine.status();
        assert!(status.ready);
        assert_eq!(status.count, 2);
        assert_eq!(engine.query(&[0.0, 1.0], Some(1)).unwrap()[0].identifier, "b.jpg");
    }

    #[test]
    fn exact_match_threshold_is_configurable() {
        let strict = SimilarityEngine::with_snapshot(
            snapshot(),
            EngineConfig {
                exact_match_threshold: 0.999_9,
                ..EngineConfig::default()
            },
        );
        let lax = SimilarityEngine::with_snapshot(
            snapshot(),
            EngineConfig {
                exact_match_threshold: 0.5,
                ..EngineConfig::default()
            },
        );

        let near = vec![0.999, 0.044_7];
        let strict_hit = &strict.query(&near, Some(1)).unwrap()[0];
        let lax_hit = &lax.query(&near, Some(1)).unwrap()[0];
        assert!(!strict_hit.is_exact_match);
        assert!(lax_hit.is_exact_match);
    }

    #[test]
    fn default_top_k_comes_from_config() {
        let engine = SimilarityEngine::with_snapshot(
            snapshot(),
            EngineConfig {
                default_top_k: 1,
                ..EngineConfig::default()
            },
        );
        assert_eq!(engine.query(&[1.0, 0.0], None).unwrap().len(), 1);
    }

    #[test]
    fn query_by_identifier_excludes_self() {
        let engine = SimilarityEngine::with_snapshot(snapshot(), EngineConfig::default());
        let matches = engine.query_by_identifier("a.jpg", None).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].identifier, "b.jpg");
    }
}
