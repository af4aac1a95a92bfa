//! Verification unit: byte-for-byte round-trip check of one chunk.
//!
//! The comparison itself is a plain slice equality. Only when it fails do we
//! pay for the diagnostics: the first differing offset and XXH64 digests of
//! both sides, so a failed cell can be told apart from a truncated one at a
//! glance.

use std::fmt;

use xxhash_rust::xxh64::xxh64;

/// Details of a failed round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Offset of the first differing byte, or the shorter length when one
    /// side is a strict prefix of the other.
    pub offset: usize,
    pub expected_len: usize,
    pub actual_len: usize,
    pub expected_digest: u64,
    pub actual_digest: u64,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "first difference at byte {} (expected {} bytes, xxh64 {:016x}; got {} bytes, xxh64 {:016x})",
            self.offset, self.expected_len, self.expected_digest, self.actual_len, self.actual_digest
        )
    }
}

/// Compares `decoded` against `original`.
///
/// A length difference counts as a mismatch even if the common prefix agrees.
pub fn verify_chunk(original: &[u8], decoded: &[u8]) -> Result<(), Mismatch> {
    if original == decoded {
        return Ok(());
    }
    let offset = original
        .iter()
        .zip(decoded.iter())
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| original.len().min(decoded.len()));
    Err(Mismatch {
        offset,
        expected_len: original.len(),
        actual_len: decoded.len(),
        expected_digest: xxh64(original, 0),
        actual_digest: xxh64(decoded, 0),
    })
}
