// config.rs — Compile-time configuration constants for the benchmark harness.
//
// Runtime knobs (codec selection, iterations, memory limit, ...) live in
// `bench::config::BenchConfig`; the values here are the fixed limits and
// defaults those knobs fall back to.

// Size multipliers.
pub const KB: usize = 1 << 10;
pub const MB: usize = 1 << 20;
pub const GB: usize = 1 << 30;

/// Maximum length of the reference-library directory name, counting the
/// trailing `/` and the NUL terminator the native loader needs.
pub const MAX_FILENAME_LEN: usize = 128;

/// Default number of compress/decompress passes over the input.
pub const BENCH_NUM_ITERS: u32 = 10;

/// Default ceiling on the input processed in memory at a time (one chunk).
///
/// Kept at 1 GiB: the LZ4 entry points take `int` lengths and refuse inputs
/// above `0x7E000000` bytes, so the compressed buffer bound for a full
/// chunk must still fit a C `int`.
pub const MAX_MEM_SIZE_FOR_FILE_READ: usize = GB;

/// Sentinel meaning "no level given": sweep the descriptor's full range.
pub const UNINIT_LEVEL: i32 = 999;

/// Sentinel meaning "no extra parameter given": use the descriptor default.
pub const UNINIT_OPT_VAR: i32 = 999;

/// Minimum headroom added to the compressed-output buffer.
pub const MIN_PAD_SIZE: usize = 16 * KB;
