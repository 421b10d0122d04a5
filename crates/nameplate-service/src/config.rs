//! Metadata service configuration.

use nameplate_core::projector::WriteLimits;

/// Configuration for the metadata service.
#[derive(Debug, Clone)]
pub struct MetadataConfig {
    /// Maximum description length in bytes (default: 1024).
    pub max_description_length: usize,
    /// Maximum number of tags per resource (default: 64).
    pub max_tags: usize,
    /// Optimistic-concurrency retries when applying an orchestration
    /// signal that races a client mutation (default: 3).
    pub signal_retry_budget: u32,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            max_description_length: 1024,
            max_tags: 64,
            signal_retry_budget: 3,
        }
    }
}

impl MetadataConfig {
    pub fn write_limits(&self) -> WriteLimits {
        WriteLimits {
            max_description_length: self.max_description_length,
            max_tags: self.max_tags,
        }
    }
}
