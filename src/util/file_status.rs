//! File type checks.
//!
//! Uses `stat(2)` through `nix` and tests the `S_IFMT` bits directly, so a
//! symlink is classified by its target.

use std::path::Path;

use nix::sys::stat::{stat, SFlag};

fn file_type(path: &Path) -> Option<SFlag> {
    let st = stat(path).ok()?;
    Some(SFlag::from_bits_truncate(st.st_mode & SFlag::S_IFMT.bits()))
}

/// `true` if `path` names a regular file.
///
/// `false` for directories, devices, FIFOs and paths that do not exist.
pub fn is_reg_file(path: &Path) -> bool {
    file_type(path) == Some(SFlag::S_IFREG)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
