use std::path::{Path, PathBuf};

pub const MANIFEST_FILE_NAME: &str = "manifest.json";
pub const DEFAULT_STORE_DIR_NAME: &str = ".pixseek";

#[must_use]
pub fn manifest_path(store_dir: &Path) -> PathBuf {
    store_dir.join(MANIFEST_FILE_NAME)
}

#[must_use]
pub fn vectors_path(store_dir: &Path, generation: u64) -> PathBuf {
    store_dir.join(format!("vectors-{generation}.bin"))
}

#[must_use]
pub fn identifiers_path(store_dir: &Path, generation: u64) -> PathBuf {
    store_dir.join(format!("identifiers-{generation}.json"))
}

/// Default store location under a collection root.
#[must_use]
pub fn default_store_dir(root: &Path) -> PathBuf {
    root.join(DEFAULT_STORE_DIR_NAME)
}
