//! File size of the benchmark input.
//!
//! A size of `0` stands for "nothing to benchmark": empty regular files, and
//! anything opened that is not a regular file at all (pipes, directories).
//! Callers that must tell those apart check [`super::is_reg_file`] first.

use std::fs::File;

/// Size in bytes of the open regular file `file`, else `0`.
pub fn get_open_file_size(file: &File) -> u64 {
    file.metadata()
        .ok()
        .filter(|m| m.file_type().is_file())
        .map(|m| m.len())
        .unwrap_or(0)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
