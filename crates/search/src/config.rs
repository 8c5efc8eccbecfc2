use serde::{Deserialize, Serialize};

/// Default score above which a hit is considered "the same image".
pub const DEFAULT_EXACT_MATCH_THRESHOLD: f32 = 0.99;

/// Default number of results returned when the caller does not ask
/// for a specific count.
pub const DEFAULT_TOP_K: usize = 10;

/// Engine policy knobs, loadable from `pixseek.toml`.
///
/// The exact-match threshold is policy, not a structural property of
/// cosine similarity, so it lives in configuration rather than as a
/// literal at the call site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub exact_match_threshold: f32,
    pub default_top_k: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exact_match_threshold: DEFAULT_EXACT_MATCH_THRESHOLD,
            default_top_k: DEFAULT_TOP_K,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_policy_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.exact_match_threshold, DEFAULT_EXACT_MATCH_THRESHOLD);
        assert_eq!(config.default_top_k, DEFAULT_TOP_K);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config = EngineConfig::from_toml_str("exact_match_threshold = 0.95\n").unwrap();
        assert_eq!(config.exact_match_threshold, 0.95);
        assert_eq!(config.default_top_k, DEFAULT_TOP_K);
    }

    #[test]
    fn full_toml_overrides_everything() {
        let raw = "exact_match_threshold = 0.9\ndefault_top_k = 3\n";
        let config = EngineConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.exact_match_threshold, 0.9);
        assert_eq!(config.default_top_k, 3);
    }
}
