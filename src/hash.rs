//! Whole-content integrity verification.
//!
//! # Examples
//!
//! ```rust
//! use splinter::hash::{sha256_hex, verify_sha256};
//!
//! let digest = sha256_hex(b"");
//! assert_eq!(digest, "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
//! assert!(verify_sha256(b"", &digest).is_ok());
//! assert!(verify_sha256(b"x", &digest).is_err());
//! ```

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Lowercase hex SHA-256 of `content`.
pub fn sha256_hex(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Check `content` against a hex-encoded SHA-256 digest.
///
/// The comparison runs in constant time with respect to the digest bytes.
pub fn verify_sha256(content: &[u8], expected_hex: &str) -> Result<()> {
    let expected =
        hex::decode(expected_hex.trim()).map_err(|_| Error::InvalidChecksum(expected_hex.into()))?;
    let actual = Sha256::digest(content);

    if !bool::from(actual.as_slice().ct_eq(&expected)) {
        return Err(Error::ChecksumMismatch {
            expected: expected_hex.to_string(),
            actual: hex::encode(actual),
        });
    }
    Ok(())
}
