//! Statistics aggregator for one (codec, level) cell.
//!
//! Times are accumulated as integer nanoseconds and only converted to
//! milliseconds / MB/s in [`RunResult::summarize`]. The best time of an
//! operation is the smallest per-iteration sum of its chunk times: it starts
//! at `u64::MAX` and every completed iteration takes the minimum, so a cell
//! with at least one iteration always has a best time no larger than any
//! iteration it saw, zero included.

use crate::timefn::{ns_to_ms, DurationNs};

/// Running totals for one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub compressed_bytes: u64,
    pub decompressed_bytes: u64,
    pub compress_ns: DurationNs,
    pub decompress_ns: DurationNs,
    pub best_compress_ns: DurationNs,
    pub best_decompress_ns: DurationNs,
    iter_compress_ns: DurationNs,
    iter_decompress_ns: DurationNs,
    iterations: u32,
}

impl Default for RunResult {
    fn default() -> Self {
        RunResult::new()
    }
}

impl RunResult {
    /// Zeroed totals with best times at the `u64::MAX` sentinel.
    pub fn new() -> Self {
        RunResult {
            compressed_bytes: 0,
            decompressed_bytes: 0,
            compress_ns: 0,
            decompress_ns: 0,
            best_compress_ns: DurationNs::MAX,
            best_decompress_ns: DurationNs::MAX,
            iter_compress_ns: 0,
            iter_decompress_ns: 0,
            iterations: 0,
        }
    }

    /// Adds one chunk's round trip.
    pub fn record_chunk(&mut self, compressed: usize, compress_ns: DurationNs, decompressed: usize, decompress_ns: DurationNs) {
        self.compressed_bytes += compressed as u64;
        self.decompressed_bytes += decompressed as u64;
        self.compress_ns = self.compress_ns.saturating_add(compress_ns);
        self.decompress_ns = self.decompress_ns.saturating_add(decompress_ns);
        self.iter_compress_ns = self.iter_compress_ns.saturating_add(compress_ns);
        self.iter_decompress_ns = self.iter_decompress_ns.saturating_add(decompress_ns);
    }

    /// Closes the current iteration and folds it into the best times.
    pub fn finish_iteration(&mut self) {
        self.best_compress_ns = self.best_compress_ns.min(self.iter_compress_ns);
        self.best_decompress_ns = self.best_decompress_ns.min(self.iter_decompress_ns);
        self.iter_compress_ns = 0;
        self.iter_decompress_ns = 0;
        self.iterations += 1;
    }

    /// Completed iterations.
    #[inline]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Best compress time, or `None` before the first completed iteration.
    pub fn best_compress(&self) -> Option<DurationNs> {
        (self.iterations > 0).then_some(self.best_compress_ns)
    }

    pub fn best_decompress(&self) -> Option<DurationNs> {
        (self.iterations > 0).then_some(self.best_decompress_ns)
    }

    /// Derives the reported figures for an input of `file_size` bytes run
    /// `iterations` times.
    pub fn summarize(&self, file_size: u64, iterations: u32) -> CellSummary {
        let iters = iterations.max(1) as u64;
        let processed = file_size as f64 * iters as f64;
        let best_c = self.best_compress().unwrap_or(0);
        let best_d = self.best_decompress().unwrap_or(0);

        CellSummary {
            compress: OpSummary {
                speed_avg: mb_per_s(processed, self.compress_ns),
                time_avg_ms: ns_to_ms(self.compress_ns) / iters as f64,
                size: self.compressed_bytes / iters,
                speed_best: mb_per_s(file_size as f64, best_c),
                time_best_ms: ns_to_ms(best_c),
            },
            decompress: OpSummary {
                speed_avg: mb_per_s(processed, self.decompress_ns),
                time_avg_ms: ns_to_ms(self.decompress_ns) / iters as f64,
                size: self.decompressed_bytes / iters,
                speed_best: mb_per_s(file_size as f64, best_d),
                time_best_ms: ns_to_ms(best_d),
            },
            ratio: if file_size == 0 {
                0.0
            } else {
                (self.compressed_bytes as f64 * 100.0 / iters as f64) / file_size as f64
            },
        }
    }
}

/// bytes * 1000 / ns, i.e. bytes per microsecond; 0 when no time elapsed.
fn mb_per_s(bytes: f64, ns: DurationNs) -> f64 {
    if ns == 0 {
        0.0
    } else {
        bytes * 1000.0 / ns as f64
    }
}

/// Reported figures for one direction of the round trip.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OpSummary {
    /// MB/s over all iterations.
    pub speed_avg: f64,
    /// Milliseconds per iteration.
    pub time_avg_ms: f64,
    /// Bytes produced per iteration.
    pub size: u64,
    /// MB/s of the best iteration.
    pub speed_best: f64,
    pub time_best_ms: f64,
}

/// Everything the statistics block of a report prints.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellSummary {
    pub compress: OpSummary,
    pub decompress: OpSummary,
    /// Compressed size as a percentage of the input.
    pub ratio: f64,
}
