use serde::{Deserialize, Serialize};

/// Statistics about one build or append run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Image files the scanner (or caller) offered for indexing.
    pub scanned: usize,

    /// Entries actually written to the store.
    pub indexed: usize,

    /// Items skipped during extraction, with reasons.
    pub skipped: Vec<String>,

    /// Wall-clock time in milliseconds.
    pub time_ms: u64,
}

impl IndexStats {
    pub fn add_skipped(&mut self, item: String) {
        self.skipped.push(item);
    }
}
