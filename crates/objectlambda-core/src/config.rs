//! Pipeline configuration.
//!
//! Provides [`LambdaConfig`] for the GetObject pipeline. Values are
//! loaded from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::checksums::ChecksumAlgorithm;

/// Default part size: 5 MiB, matching the multipart upload convention of
/// the backing store.
pub const DEFAULT_PART_SIZE: usize = 5 * 1024 * 1024;

/// GetObject pipeline configuration.
///
/// # Examples
///
/// ```
/// use objectlambda_core::config::LambdaConfig;
///
/// let config = LambdaConfig::default();
/// assert_eq!(config.part_size, 5 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct LambdaConfig {
    /// Fixed chunk size (in bytes) used to resolve `partNumber` selectors
    /// against the transformed object.
    #[builder(default = DEFAULT_PART_SIZE)]
    pub part_size: usize,

    /// Algorithm used for the response body checksum.
    #[builder(default = ChecksumAlgorithm::Sha256)]
    pub checksum_algorithm: ChecksumAlgorithm,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for LambdaConfig {
    fn default() -> Self {
        Self {
            part_size: DEFAULT_PART_SIZE,
            checksum_algorithm: ChecksumAlgorithm::Sha256,
            log_level: String::from("info"),
        }
    }
}

impl LambdaConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `PART_SIZE` | `5242880` |
    /// | `CHECKSUM_ALGORITHM` | `SHA256` |
    /// | `LOG_LEVEL` | `info` |
    ///
    /// Unparseable values fall back to the default rather than aborting
    /// startup.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("PART_SIZE") {
            if let Ok(size) = v.parse::<usize>() {
                if size > 0 {
                    config.part_size = size;
                }
            }
        }
        if let Ok(v) = std::env::var("CHECKSUM_ALGORITHM") {
            if let Ok(algo) = v.parse() {
                config.checksum_algorithm = algo;
            }
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }
}
