use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Image file extensions accepted for indexing (matched
/// case-insensitively, so `.JPG` and `.jpg` both qualify).
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];

/// Scanner for finding image files under a collection root.
pub struct ImageScanner {
    root: PathBuf,
}

impl ImageScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Recursively collect image files, skipping hidden entries.
    /// Returns a sorted, deduplicated list so index order is stable
    /// across runs.
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false);

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }
                    let path = entry.path();
                    if Self::is_image_file(path) {
                        files.push(path.to_path_buf());
                    }
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        files.dedup();
        log::info!("Found {} image files under {}", files.len(), self.root.display());
        files
    }

    fn is_image_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                IMAGE_EXTENSIONS.iter().any(|candidate| candidate == &ext)
            })
            .unwrap_or(false)
    }
}
