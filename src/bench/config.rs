//! Benchmark configuration: runtime parameters for one sweep.
//!
//! [`BenchConfig`] holds every tuneable setting of a run (codec selection,
//! level, iterations, memory limit, verify / stats flags, library directory).
//! Its builder-style setters let callers construct a configuration
//! incrementally before handing it to [`super::bench_file`].
//!
//! Level and extra parameter use the sentinels [`UNINIT_LEVEL`] and
//! [`UNINIT_OPT_VAR`] for "not given"; the sweep resolves them against the
//! codec's descriptor.

use std::ops::RangeInclusive;

use crate::cli::constants::DEFAULT_REPORT_LABEL;
use crate::config::{BENCH_NUM_ITERS, MAX_MEM_SIZE_FOR_FILE_READ, UNINIT_LEVEL, UNINIT_OPT_VAR};

use super::codecs::CodecId;
use super::error::BenchError;
use super::loader::LibraryDir;

/// Which codecs a run sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodecSelection {
    /// Every reference-supported codec in table order, each over its full
    /// level range with the descriptor's extra parameter.
    #[default]
    All,
    /// One codec; level and extra parameter follow the config.
    Single(CodecId),
}

// ── BenchConfig struct ────────────────────────────────────────────────────────

/// Runtime parameters controlling a single benchmark run.
///
/// Construct via [`Default`] and then adjust with the builder-style setters,
/// or set fields directly.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Codec(s) to sweep (default: all).
    pub codec: CodecSelection,

    /// Level for single-codec mode; [`UNINIT_LEVEL`] sweeps the full range.
    pub level: i32,

    /// Codec-specific extra parameter; [`UNINIT_OPT_VAR`] uses the descriptor value.
    pub extra: i32,

    /// Passes over the whole input per cell (default: [`BENCH_NUM_ITERS`]).
    pub iterations: u32,

    /// Largest chunk held in memory, in bytes (default: [`MAX_MEM_SIZE_FOR_FILE_READ`]).
    pub mem_limit: usize,

    /// Compare every decompressed chunk against its source.
    pub verify: bool,

    /// Accumulate timings and emit the statistics block per cell.
    pub print_stats: bool,

    /// Reference-library directory; empty uses the platform search path.
    pub library_dir: String,

    /// Tag opening every report line.
    pub label: String,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            codec: CodecSelection::All,
            level: UNINIT_LEVEL,
            extra: UNINIT_OPT_VAR,
            iterations: BENCH_NUM_ITERS,
            mem_limit: MAX_MEM_SIZE_FOR_FILE_READ,
            verify: false,
            print_stats: false,
            library_dir: String::new(),
            label: DEFAULT_REPORT_LABEL.to_owned(),
        }
    }
}

impl BenchConfig {
    // ── Setters ───────────────────────────────────────────────────────────────

    pub fn set_codec(&mut self, codec: CodecId) -> &mut Self {
        self.codec = CodecSelection::Single(codec);
        self
    }

    pub fn set_all_codecs(&mut self) -> &mut Self {
        self.codec = CodecSelection::All;
        self
    }

    /// Fixes the level for single-codec mode. Pass [`UNINIT_LEVEL`] to sweep.
    pub fn set_level(&mut self, level: i32) -> &mut Self {
        self.level = level;
        self
    }

    pub fn set_extra(&mut self, extra: i32) -> &mut Self {
        self.extra = extra;
        self
    }

    pub fn set_iterations(&mut self, iterations: u32) -> &mut Self {
        self.iterations = iterations;
        self
    }

    /// Sets the chunk ceiling in bytes.
    pub fn set_mem_limit(&mut self, bytes: usize) -> &mut Self {
        self.mem_limit = bytes;
        self
    }

    pub fn set_verify(&mut self, verify: bool) -> &mut Self {
        self.verify = verify;
        self
    }

    pub fn set_print_stats(&mut self, print_stats: bool) -> &mut Self {
        self.print_stats = print_stats;
        self
    }

    pub fn set_library_dir(&mut self, dir: &str) -> &mut Self {
        self.library_dir = dir.to_owned();
        self
    }

    pub fn set_label(&mut self, label: &str) -> &mut Self {
        self.label = label.to_owned();
        self
    }

    // ── Derived values ────────────────────────────────────────────────────────

    /// Checks everything that can be checked before touching a library and
    /// returns the normalised library directory.
    pub fn validate(&self) -> Result<LibraryDir, BenchError> {
        if self.iterations == 0 {
            return Err(BenchError::InvalidIterations(self.iterations));
        }
        if self.mem_limit == 0 {
            return Err(BenchError::InvalidMemLimit(self.mem_limit));
        }
        if let CodecSelection::Single(codec) = self.codec {
            if !codec.is_reference_supported() {
                return Err(BenchError::UnsupportedCodec(codec));
            }
        }
        LibraryDir::new(&self.library_dir)
    }

    /// Iterations actually run: a verify-only run needs a single pass.
    pub fn effective_iterations(&self) -> u32 {
        if self.verify && !self.print_stats {
            1
        } else {
            self.iterations
        }
    }

    /// Codecs whose libraries the run needs, in table order.
    pub fn selected_codecs(&self) -> Vec<CodecId> {
        match self.codec {
            CodecSelection::All => CodecId::reference_supported().collect(),
            CodecSelection::Single(codec) => vec![codec],
        }
    }

    /// Levels swept for `codec`.
    pub fn level_range(&self, codec: CodecId) -> RangeInclusive<i32> {
        match self.codec {
            CodecSelection::Single(_) if self.level != UNINIT_LEVEL => self.level..=self.level,
            _ => codec.descriptor().levels(),
        }
    }

    /// Extra parameter passed to `codec`.
    pub fn extra_for(&self, codec: CodecId) -> i32 {
        match self.codec {
            CodecSelection::Single(_) if self.extra != UNINIT_OPT_VAR => self.extra,
            _ => codec.descriptor().extra_param,
        }
    }

    /// Chunk size for an input of `file_size` bytes: the whole file when it
    /// fits the memory limit.
    pub fn chunk_size(&self, file_size: u64) -> usize {
        if file_size < self.mem_limit as u64 {
            file_size as usize
        } else {
            self.mem_limit
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
