use crate::error::{Result, VectorStoreError};
use crate::format;
use crate::paths;
use crate::types::{FeatureVector, IndexEntry, IndexSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Commit point for a persisted snapshot: names the generation whose
/// artifact pair is complete on disk. Written last, via tmp + atomic
/// rename, so a crash mid-save leaves the previous pair readable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub generation: u64,
    pub count: usize,
    pub dim: usize,
}

/// Durable persistence and in-memory availability of the index
/// snapshot: an ordered vector table plus a positionally aligned
/// identifier list, stored as two companion artifacts per generation.
pub struct VectorStore {
    dir: PathBuf,
    snapshot: IndexSnapshot,
    generation: u64,
}

impl VectorStore {
    /// Open a store rooted at `dir` without touching disk. The store
    /// is not ready until [`load`](Self::load) or [`save`](Self::save)
    /// succeeds.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            snapshot: IndexSnapshot::not_ready(),
            generation: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_ready(&self) -> bool {
        self.snapshot.ready
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Current in-memory snapshot. Not ready (and empty) before the
    /// first successful load or save.
    pub fn snapshot(&self) -> &IndexSnapshot {
        &self.snapshot
    }

    /// Read the persisted snapshot into memory.
    ///
    /// Fails with `NotFound` when the manifest or either artifact is
    /// absent, and with `CorruptData` when the pair disagrees on entry
    /// count or dimensionality.
    pub async fn load(&mut self) -> Result<IndexSnapshot> {
        let manifest_path = paths::manifest_path(&self.dir);
        if !manifest_path.exists() {
            return Err(VectorStoreError::NotFound(self.dir.display().to_string()));
        }
        let manifest: Manifest =
            serde_json::from_slice(&tokio::fs::read(&manifest_path).await?)?;

        let vectors_path = paths::vectors_path(&self.dir, manifest.generation);
        let identifiers_path = paths::identifiers_path(&self.dir, manifest.generation);
        if !vectors_path.exists() || !identifiers_path.exists() {
            return Err(VectorStoreError::NotFound(self.dir.display().to_string()));
        }

        let vectors = format::decode_vectors(&tokio::fs::read(&vectors_path).await?)?;
        let identifiers: Vec<String> =
            serde_json::from_slice(&tokio::fs::read(&identifiers_path).await?)?;

        if vectors.len() != identifiers.len() {
            return Err(VectorStoreError::CorruptData(format!(
                "{} vectors but {} identifiers",
                vectors.len(),
                identifiers.len()
            )));
        }
        if vectors.len() != manifest.count {
            return Err(VectorStoreError::CorruptData(format!(
                "manifest records {} entries, artifacts hold {}",
                manifest.count,
                vectors.len()
            )));
        }
        if let Some(first) = vectors.first() {
            if first.len() != manifest.dim {
                return Err(VectorStoreError::CorruptData(format!(
                    "manifest records dim {}, artifact holds dim {}",
                    manifest.dim,
                    first.len()
                )));
            }
        }

        let entries = identifiers
            .into_iter()
            .zip(vectors)
            .map(|(identifier, vector)| IndexEntry { identifier, vector })
            .collect();

        self.snapshot = IndexSnapshot::new(entries);
        self.generation = manifest.generation;
        log::info!(
            "Loaded index generation {} with {} entries from {}",
            self.generation,
            self.snapshot.len(),
            self.dir.display()
        );
        Ok(self.snapshot.clone())
    }

    /// Persist a full snapshot, replacing any previous one, and make
    /// it the in-memory snapshot.
    ///
    /// Both artifacts of the new generation are written before the
    /// manifest is swapped into place, so a concurrent or subsequent
    /// `load` sees either the old pair or the new pair, never a
    /// mismatched mix.
    pub async fn save(
        &mut self,
        vectors: Vec<FeatureVector>,
        identifiers: Vec<String>,
    ) -> Result<()> {
        validate_parallel(&vectors, &identifiers)?;

        // A fresh handle that never loaded still has generation 0; a
        // rebuild through it must not collide with the committed pair
        // on disk. Recover the committed generation from the manifest
        // so new artifacts always land under a fresh name.
        if self.generation == 0 {
            self.generation = self.committed_generation().await;
        }
        let generation = self.generation + 1;
        tokio::fs::create_dir_all(&self.dir).await?;

        let dim = vectors.first().map_or(0, Vec::len);
        let manifest = Manifest {
            generation,
            count: vectors.len(),
            dim,
        };

        tokio::fs::write(
            paths::vectors_path(&self.dir, generation),
            format::encode_vectors(&vectors),
        )
        .await?;
        tokio::fs::write(
            paths::identifiers_path(&self.dir, generation),
            serde_json::to_vec_pretty(&identifiers)?,
        )
        .await?;

        let manifest_path = paths::manifest_path(&self.dir);
        let tmp = manifest_path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(&manifest)?).await?;
        tokio::fs::rename(&tmp, &manifest_path).await?;

        let previous = self.generation;
        self.generation = generation;
        self.snapshot = IndexSnapshot::new(
            identifiers
                .into_iter()
                .zip(vectors)
                .map(|(identifier, vector)| IndexEntry { identifier, vector })
                .collect(),
        );

        self.remove_stale_generation(previous).await;
        log::info!(
            "Saved index generation {generation} with {} entries to {}",
            self.snapshot.len(),
            self.dir.display()
        );
        Ok(())
    }

    /// Extend the loaded snapshot with new entries and re-save.
    ///
    /// Requires a prior successful load or save (`NotReady`); rejects
    /// identifiers already present (`DuplicateIdentifier`) and vectors
    /// whose dimension differs from the snapshot's
    /// (`DimensionMismatch`).
    pub async fn append(
        &mut self,
        new_vectors: Vec<FeatureVector>,
        new_identifiers: Vec<String>,
    ) -> Result<()> {
        if !self.snapshot.ready {
            return Err(VectorStoreError::NotReady);
        }
        validate_parallel(&new_vectors, &new_identifiers)?;

        if let (Some(dim), Some(first)) = (self.snapshot.dimension(), new_vectors.first()) {
            if first.len() != dim {
                return Err(VectorStoreError::DimensionMismatch {
                    expected: dim,
                    actual: first.len(),
                });
            }
        }

        let existing: HashSet<&str> = self
            .snapshot
            .entries
            .iter()
            .map(|e| e.identifier.as_str())
            .collect();
        for identifier in &new_identifiers {
            if existing.contains(identifier.as_str()) {
                return Err(VectorStoreError::DuplicateIdentifier(identifier.clone()));
            }
        }

        let mut vectors: Vec<FeatureVector> = self
            .snapshot
            .entries
            .iter()
            .map(|e| e.vector.clone())
            .collect();
        let mut identifiers: Vec<String> = self
            .snapshot
            .entries
            .iter()
            .map(|e| e.identifier.clone())
            .collect();
        vectors.extend(new_vectors);
        identifiers.extend(new_identifiers);

        log::info!(
            "Appending to index: {} total entries after concat",
            vectors.len()
        );
        self.save(vectors, identifiers).await
    }

    /// Generation the on-disk manifest currently points at, or 0 when
    /// no committed snapshot exists. A malformed manifest also reads
    /// as 0: the store was not loadable anyway, so its artifact names
    /// are fair game.
    async fn committed_generation(&self) -> u64 {
        let path = paths::manifest_path(&self.dir);
        let Ok(bytes) = tokio::fs::read(&path).await else {
            return 0;
        };
        match serde_json::from_slice::<Manifest>(&bytes) {
            Ok(manifest) => manifest.generation,
            Err(e) => {
                log::warn!("Ignoring malformed manifest {}: {e}", path.display());
                0
            }
        }
    }

    async fn remove_stale_generation(&self, generation: u64) {
        if generation == 0 {
            return;
        }
        for path in [
            paths::vectors_path(&self.dir, generation),
            paths::identifiers_path(&self.dir, generation),
        ] {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                log::warn!("Failed to remove stale artifact {}: {e}", path.display());
            }
        }
    }
}

/// Shared validation for save/append input: parallel lists of equal
/// length, uniform vector dimension, no duplicate identifiers within
/// the batch.
fn validate_parallel(vectors: &[FeatureVector], identifiers: &[String]) -> Result<()> {
    if vectors.len() != identifiers.len() {
        return Err(VectorStoreError::DimensionMismatch {
            expected: identifiers.len(),
            actual: vectors.len(),
        });
    }
    if let Some(first) = vectors.first() {
        for vector in vectors {
            if vector.len() != first.len() {
                return Err(VectorStoreError::DimensionMismatch {
                    expected: first.len(),
                    actual: vector.len(),
                });
            }
        }
    }
    let mut seen = HashSet::with_capacity(identifiers.len());
    for identifier in identifiers {
        if !seen.insert(identifier.as_str()) {
            return Err(VectorStoreError::DuplicateIdentifier(identifier.clone()));
        }
    }
    Ok(())
}
