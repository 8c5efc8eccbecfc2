use crate::error::{IndexerError, Result};
use async_trait::async_trait;
use pixseek_vector_store::{l2_normalize, FeatureVector};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Outcome of a batch extraction. Per-file failures never abort the
/// batch; they are reported in `skipped` and the rest proceeds.
/// `vectors` and `identifiers` stay positionally aligned.
#[derive(Debug, Default)]
pub struct BatchExtraction {
    pub vectors: Vec<FeatureVector>,
    pub identifiers: Vec<String>,
    pub skipped: Vec<(PathBuf, String)>,
}

/// Black-box image-to-vector capability.
///
/// The substance of extraction (a pretrained CNN such as ResNet50) is
/// an external concern; the index only requires that every extractor
/// yields unit-norm vectors of a fixed dimension.
#[async_trait]
pub trait FeatureExtractor: Send + Sync {
    /// Fixed output dimension of this extractor.
    fn dimension(&self) -> usize;

    /// Extract a normalized feature vector from one image file.
    async fn extract(&self, path: &Path) -> Result<FeatureVector>;

    /// Extract features for many images, tolerating per-file failures.
    async fn extract_batch(&self, paths: &[PathBuf]) -> BatchExtraction {
        let mut batch = BatchExtraction::default();
        for path in paths {
            match self.extract(path).await {
                Ok(vector) => {
                    batch.identifiers.push(path.display().to_string());
                    batch.vectors.push(vector);
                }
                Err(e) => {
                    log::warn!("Skipping {}: {e}", path.display());
                    batch.skipped.push((path.clone(), e.to_string()));
                }
            }
        }
        batch
    }
}

pub const DEFAULT_STUB_DIMENSION: usize = 128;

/// Deterministic model-free extractor: expands a SHA-256 digest of
/// the image bytes into a unit-norm vector.
///
/// Two byte-identical files always map to the same vector (cosine
/// 1.0), which is what tests and model-free smoke runs need; it makes
/// no claim of visual similarity for distinct files.
pub struct HashExtractor {
    dimension: usize,
}

impl HashExtractor {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn expand(&self, seed: &[u8; 32]) -> FeatureVector {
        let mut vector = Vec::with_capacity(self.dimension);
        let mut block: u64 = 0;
        while vector.len() < self.dimension {
            let mut hasher = Sha256::new();
            hasher.update(seed);
            hasher.update(block.to_le_bytes());
            let digest = hasher.finalize();
            for chunk in digest.chunks_exact(4) {
                if vector.len() == self.dimension {
                    break;
                }
                let raw = u32::from_le_bytes(chunk.try_into().unwrap());
                vector.push(raw as f32 / u32::MAX as f32);
            }
            block += 1;
        }
        l2_normalize(&mut vector);
        vector
    }
}

impl Default for HashExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_STUB_DIMENSION)
    }
}

#[async_trait]
impl FeatureExtractor for HashExtractor {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn extract(&self, path: &Path) -> Result<FeatureVector> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| IndexerError::Extraction {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        let seed: [u8; 32] = Sha256::digest(&bytes).into();
        Ok(self.expand(&seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixseek_vector_store::{l2_norm, UNIT_NORM_TOLERANCE};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn output_is_deterministic_and_unit_norm() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("cat.jpg");
        fs::write(&path, b"fake image bytes").unwrap();

        let extractor = HashExtractor::default();
        let a = extractor.extract(&path).await.unwrap();
        let b = extractor.extract(&path).await.unwrap();

        assert_eq!(a.len(), DEFAULT_STUB_DIMENSION);
        assert_eq!(a, b);
        assert!((l2_norm(&a) - 1.0).abs() < UNIT_NORM_TOLERANCE);
    }

    #[tokio::test]
    async fn distinct_contents_yield_distinct_vectors() {
        let temp = tempdir().unwrap();
        let one = temp.path().join("one.jpg");
        let two = temp.path().join("two.jpg");
        fs::write(&one, b"first").unwrap();
        fs::write(&two, b"second").unwrap();

        let extractor = HashExtractor::new(16);
        let a = extractor.extract(&one).await.unwrap();
        let b = extractor.extract(&two).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn batch_tolerates_unreadable_files() {
        let temp = tempdir().unwrap();
        let good = temp.path().join("good.jpg");
        fs::write(&good, b"pixels").unwrap();
        let missing = temp.path().join("missing.jpg");

        let extractor = HashExtractor::new(16);
        let batch = extractor
            .extract_batch(&[good.clone(), missing.clone()])
            .await;

        assert_eq!(batch.vectors.len(), 1);
        assert_eq!(batch.identifiers, vec![good.display().to_string()]);
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.skipped[0].0, missing);
    }
}
