// codec-bench — benchmark harness for native LZ4, LZ4HC, ZLIB and BZIP2 libraries

pub mod timefn;
pub mod config;
pub mod util;
pub mod bench;
pub mod cli;

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use bench::{bench_file, bench_file_with, bench_reader, BenchConfig, BenchError, CodecId};
