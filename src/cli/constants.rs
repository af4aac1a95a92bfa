// cli/constants.rs — program identity strings, verbosity levels, and the
// display macros shared by the library and the binary.

use std::sync::atomic::{AtomicU32, Ordering};

// ── Identity ──────────────────────────────────────────────────────────────────
pub const PROGRAM_NAME: &str = "codec_bench";
pub const PROGRAM_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default prefix of every report line (identifies the reference libraries).
pub const DEFAULT_REPORT_LABEL: &str = "NATIVE";

// ── Verbosity levels ──────────────────────────────────────────────────────────
//
// 0 = no diagnostics; 1 = errors (default); 2 = info; 3 = debug; 4 = trace.
// Report lines are not gated by these levels.
pub const LEVEL_SILENT: u32 = 0;
pub const LEVEL_ERR: u32 = 1;
pub const LEVEL_INFO: u32 = 2;
pub const LEVEL_DEBUG: u32 = 3;
pub const LEVEL_TRACE: u32 = 4;

pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(LEVEL_ERR);

/// Returns the current display level.
#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Sets the display level.
#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

/// Clamps a user-supplied verbosity to the supported range.
///
/// Out-of-range values (including 0 from an empty `-v`) select errors-only.
pub fn clamp_verbosity(requested: u32) -> u32 {
    if (LEVEL_ERR..=LEVEL_TRACE).contains(&requested) {
        requested
    } else {
        LEVEL_ERR
    }
}

// ── Display helpers ───────────────────────────────────────────────────────────

/// Print to stderr when the display level is at or above `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::cli::constants::display_level() >= $level {
            eprint!($($arg)*);
        }
    };
}

/// Trace-level function entry/exit marker.
#[macro_export]
macro_rules! trace_point {
    ($what:expr) => {
        $crate::displaylevel!(
            $crate::cli::constants::LEVEL_TRACE,
            "[trace] {}: {}\n",
            module_path!(),
            $what
        )
    };
}
