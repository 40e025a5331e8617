//! Body checksum computation.
//!
//! The response carries an integrity checksum of the final extracted
//! payload in the `body-checksum-algorithm` / `body-checksum-digest`
//! metadata pair. Digests are base64-encoded.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use digest::Digest;
use serde::{Deserialize, Serialize};

/// Response metadata key carrying the checksum algorithm name.
pub const CHECKSUM_ALGORITHM_KEY: &str = "body-checksum-algorithm";

/// Response metadata key carrying the base64 digest.
pub const CHECKSUM_DIGEST_KEY: &str = "body-checksum-digest";

/// Supported checksum algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChecksumAlgorithm {
    /// CRC-32 (IEEE 802.3).
    Crc32,
    /// CRC-32C (Castagnoli).
    Crc32c,
    /// MD5.
    Md5,
    /// SHA-1.
    Sha1,
    /// SHA-256.
    Sha256,
}

impl ChecksumAlgorithm {
    /// The canonical string representation used in response metadata.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crc32 => "CRC32",
            Self::Crc32c => "CRC32C",
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`ChecksumAlgorithm`] from a string fails.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown checksum algorithm: {0}")]
pub struct ParseChecksumAlgorithmError(String);

impl FromStr for ChecksumAlgorithm {
    type Err = ParseChecksumAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CRC32" => Ok(Self::Crc32),
            "CRC32C" => Ok(Self::Crc32c),
            "MD5" => Ok(Self::Md5),
            "SHA1" => Ok(Self::Sha1),
            "SHA256" => Ok(Self::Sha256),
            _ => Err(ParseChecksumAlgorithmError(s.to_owned())),
        }
    }
}

/// A computed checksum: algorithm name plus base64-encoded digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    /// The algorithm's canonical name (e.g. `"SHA256"`).
    pub algorithm: String,
    /// The base64-encoded digest value.
    pub digest: String,
}

/// Compute the checksum of `data` under the given algorithm.
///
/// # Examples
///
/// ```
/// use objectlambda_core::checksums::{ChecksumAlgorithm, compute_checksum};
///
/// let checksum = compute_checksum(ChecksumAlgorithm::Sha256, b"hello");
/// assert_eq!(checksum.algorithm, "SHA256");
/// assert!(!checksum.digest.is_empty());
/// ```
#[must_use]
pub fn compute_checksum(algorithm: ChecksumAlgorithm, data: &[u8]) -> Checksum {
    let digest = match algorithm {
        ChecksumAlgorithm::Crc32 => {
            let mut hasher = crc32fast::Hasher::new();
            hasher.update(data);
            BASE64_STANDARD.encode(hasher.finalize().to_be_bytes())
        }
        ChecksumAlgorithm::Crc32c => {
            let value = crc32c::crc32c(data);
            BASE64_STANDARD.encode(value.to_be_bytes())
        }
        ChecksumAlgorithm::Md5 => {
            let hash = md5::Md5::digest(data);
            BASE64_STANDARD.encode(hash)
        }
        ChecksumAlgorithm::Sha1 => {
            let hash = sha1::Sha1::digest(data);
            BASE64_STANDARD.encode(hash)
        }
        ChecksumAlgorithm::Sha256 => {
            let hash = sha2::Sha256::digest(data);
            BASE64_STANDARD.encode(hash)
        }
    };

    Checksum {
        algorithm: algorithm.as_str().to_owned(),
        digest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_display_checksum_algorithm() {
        assert_eq!(ChecksumAlgorithm::Crc32.to_string(), "CRC32");
        assert_eq!(ChecksumAlgorithm::Crc32c.to_string(), "CRC32C");
        assert_eq!(ChecksumAlgorithm::Md5.to_string(), "MD5");
        assert_eq!(ChecksumAlgorithm::Sha1.to_string(), "SHA1");
        assert_eq!(ChecksumAlgorithm::Sha256.to_string(), "SHA256");
    }

    #[test]
    fn test_should_parse_checksum_algorithm_case_insensitively() {
        assert_eq!(
            "sha256".parse::<ChecksumAlgorithm>().ok(),
            Some(ChecksumAlgorithm::Sha256)
        );
        assert_eq!(
            "CRC32C".parse::<ChecksumAlgorithm>().ok(),
            Some(ChecksumAlgorithm::Crc32c)
        );
        assert!("blake3".parse::<ChecksumAlgorithm>().is_err());
    }

    #[test]
    fn test_should_compute_sha256_checksum() {
        let checksum = compute_checksum(ChecksumAlgorithm::Sha256, b"hello");
        assert_eq!(checksum.algorithm, "SHA256");
        let decoded = BASE64_STANDARD.decode(&checksum.digest).expect("test decode");
        assert_eq!(decoded.len(), 32);
    }

    #[test]
    fn test_should_compute_md5_checksum() {
        let checksum = compute_checksum(ChecksumAlgorithm::Md5, b"hello");
        assert_eq!(checksum.algorithm, "MD5");
        assert_eq!(checksum.digest, "XUFAKrxLKna5cZ2REBfFkg==");
    }

    #[test]
    fn test_should_compute_sha1_checksum() {
        let checksum = compute_checksum(ChecksumAlgorithm::Sha1, b"hello");
        let decoded = BASE64_STANDARD.decode(&checksum.digest).expect("test decode");
        assert_eq!(decoded.len(), 20);
    }

    #[test]
    fn test_should_compute_crc_checksums() {
        for algo in [ChecksumAlgorithm::Crc32, ChecksumAlgorithm::Crc32c] {
            let checksum = compute_checksum(algo, b"hello");
            let decoded = BASE64_STANDARD.decode(&checksum.digest).expect("test decode");
            assert_eq!(decoded.len(), 4);
        }
    }

    #[test]
    fn test_should_produce_identical_digests_for_identical_payloads() {
        let a = compute_checksum(ChecksumAlgorithm::Sha256, b"payload");
        let b = compute_checksum(ChecksumAlgorithm::Sha256, b"payload");
        assert_eq!(a, b);
    }

    #[test]
    fn test_should_produce_distinct_digests_for_distinct_payloads() {
        let a = compute_checksum(ChecksumAlgorithm::Sha256, b"payload-a");
        let b = compute_checksum(ChecksumAlgorithm::Sha256, b"payload-b");
        assert_ne!(a.digest, b.digest);
    }
}
