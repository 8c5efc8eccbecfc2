use crate::error::{IndexerError, Result};
use crate::extractor::FeatureExtractor;
use crate::scanner::ImageScanner;
use crate::stats::IndexStats;
use pixseek_vector_store::VectorStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Offline pipeline: scan a collection, extract features, persist the
/// index. Not invoked by request-serving code.
pub struct ImageIndexer {
    extractor: Arc<dyn FeatureExtractor>,
    store: VectorStore,
}

impl ImageIndexer {
    pub fn new(extractor: Arc<dyn FeatureExtractor>, store_dir: impl AsRef<Path>) -> Self {
        Self {
            extractor,
            store: VectorStore::new(store_dir),
        }
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    /// Build the index for every image under `image_dir`, replacing
    /// any previous snapshot wholesale.
    ///
    /// Per-image extraction failures are tolerated and reported in the
    /// stats; the build only fails when nothing at all could be
    /// indexed.
    pub async fn build(&mut self, image_dir: impl AsRef<Path>) -> Result<IndexStats> {
        let image_dir = image_dir.as_ref();
        if !image_dir.is_dir() {
            return Err(IndexerError::InvalidPath(image_dir.display().to_string()));
        }

        let started = Instant::now();
        let paths = ImageScanner::new(image_dir).scan();
        if paths.is_empty() {
            return Err(IndexerError::NothingIndexed(format!(
                "no image files under {}",
                image_dir.display()
            )));
        }

        log::info!("Extracting features for {} images", paths.len());
        let batch = self.extractor.extract_batch(&paths).await;
        if batch.vectors.is_empty() {
            return Err(IndexerError::NothingIndexed(
                "feature extraction produced no vectors".into(),
            ));
        }

        let mut stats = IndexStats {
            scanned: paths.len(),
            indexed: batch.vectors.len(),
            ..IndexStats::default()
        };
        for (path, reason) in &batch.skipped {
            stats.add_skipped(format!("{}: {reason}", path.display()));
        }

        self.store.save(batch.vectors, batch.identifiers).await?;
        stats.time_ms = started.elapsed().as_millis() as u64;
        log::info!(
            "Index build complete: {} indexed, {} skipped in {} ms",
            stats.indexed,
            stats.skipped.len(),
            stats.time_ms
        );
        Ok(stats)
    }

    /// Add new images to an existing index. Requires a persisted
    /// snapshot to load; identifiers already present are rejected by
    /// the store rather than silently duplicated.
    pub async fn add(&mut self, paths: &[PathBuf]) -> Result<IndexStats> {
        if !self.store.is_ready() {
            self.store.load().await?;
        }

        let started = Instant::now();
        log::info!("Adding {} images to existing index", paths.len());
        let batch = self.extractor.extract_batch(paths).await;
        if batch.vectors.is_empty() {
            return Err(IndexerError::NothingIndexed(
                "feature extraction produced no vectors".into(),
            ));
        }

        let mut stats = IndexStats {
            scanned: paths.len(),
            indexed: batch.vectors.len(),
            ..IndexStats::default()
        };
        for (path, reason) in &batch.skipped {
            stats.add_skipped(format!("{}: {reason}", path.display()));
        }

        self.store.append(batch.vectors, batch.identifiers).await?;
        stats.time_ms = started.elapsed().as_millis() as u64;
        log::info!(
            "Added {} images; index now holds {}",
            stats.indexed,
            self.store.len()
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::HashExtractor;
    use pixseek_vector_store::VectorStoreError;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn extractor() -> Arc<dyn FeatureExtractor> {
        Arc::new(HashExtractor::new(16))
    }

    #[tokio::test]
    async fn build_indexes_every_image_in_sorted_order() {
        let images = tempdir().unwrap();
        fs::write(images.path().join("b.jpg"), b"bb").unwrap();
        fs::write(images.path().join("a.jpg"), b"aa").unwrap();
        fs::write(images.path().join("skip.txt"), b"not an image").unwrap();
        let store_dir = tempdir().unwrap();

        let mut indexer = ImageIndexer::new(extractor(), store_dir.path());
        let stats = indexer.build(images.path()).await.unwrap();

        assert_eq!(stats.scanned, 2);
        assert_eq!(stats.indexed, 2);
        assert!(stats.skipped.is_empty());

        let snapshot = indexer.store().snapshot();
        assert!(snapshot.entries[0].identifier.ends_with("a.jpg"));
        assert!(snapshot.entries[1].identifier.ends_with("b.jpg"));
    }

    #[tokio::test]
    async fn build_on_empty_directory_fails() {
        let images = tempdir().unwrap();
        let store_dir = tempdir().unwrap();
        let mut indexer = ImageIndexer::new(extractor(), store_dir.path());
        assert!(matches!(
            indexer.build(images.path()).await,
            Err(IndexerError::NothingIndexed(_))
        ));
    }

    #[tokio::test]
    async fn build_on_missing_directory_is_invalid_path() {
        let store_dir = tempdir().unwrap();
        let mut indexer = ImageIndexer::new(extractor(), store_dir.path());
        assert!(matches!(
            indexer.build(store_dir.path().join("nope")).await,
            Err(IndexerError::InvalidPath(_))
        ));
    }

    #[tokio::test]
    async fn add_without_persisted_index_propagates_not_found() {
        let store_dir = tempdir().unwrap();
        let images = tempdir().unwrap();
        let path = images.path().join("new.jpg");
        fs::write(&path, b"pixels").unwrap();

        let mut indexer = ImageIndexer::new(extractor(), store_dir.path());
        let err = indexer.add(&[path]).await.unwrap_err();
        assert!(matches!(
            err,
            IndexerError::VectorStore(VectorStoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn add_extends_index_and_tolerates_missing_files() {
        let images = tempdir().unwrap();
        fs::write(images.path().join("base.jpg"), b"base").unwrap();
        let store_dir = tempdir().unwrap();

        let mut indexer = ImageIndexer::new(extractor(), store_dir.path());
        indexer.build(images.path()).await.unwrap();

        let extra = images.path().join("extra.jpg");
        fs::write(&extra, b"extra").unwrap();
        let ghost = images.path().join("ghost.jpg");

        // Fresh indexer to exercise the load-before-append path.
        let mut indexer = ImageIndexer::new(extractor(), store_dir.path());
        let stats = indexer.add(&[extra, ghost]).await.unwrap();

        assert_eq!(stats.indexed, 1);
        assert_eq!(stats.skipped.len(), 1);
        assert_eq!(indexer.store().len(), 2);
    }

    #[tokio::test]
    async fn re_adding_an_indexed_image_is_a_duplicate() {
        let images = tempdir().unwrap();
        let path = images.path().join("only.jpg");
        fs::write(&path, b"only").unwrap();
        let store_dir = tempdir().unwrap();

        let mut indexer = ImageIndexer::new(extractor(), store_dir.path());
        indexer.build(images.path()).await.unwrap();

        let err = indexer.add(&[path]).await.unwrap_err();
        assert!(matches!(
            err,
            IndexerError::VectorStore(VectorStoreError::DuplicateIdentifier(_))
        ));
        assert_eq!(indexer.store().len(), 1);
    }
}
