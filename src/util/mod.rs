//! Input-file helpers.
//!
//! - [`file_status`] — regular-file check
//! - [`file_size`]   — size of an open file

pub mod file_status;
pub mod file_size;

pub use file_status::is_reg_file;

pub use file_size::get_open_file_size;

/// File name shown in report lines: `path` without its directory part.
///
/// Both `\` and `/` count as separators.
pub fn display_name(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
