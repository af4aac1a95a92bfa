//! Chunked I/O driver: one (codec, level) cell over the whole input.
//!
//! Each iteration walks the input from the start in chunks of at most
//! [`Buffers::chunk_size`] bytes. Every chunk is compressed into the
//! compressed buffer, decompressed back into the decompressed buffer with
//! the original chunk length as capacity, optionally verified, and its
//! timings folded into the cell's [`RunResult`]. The reader is rewound after
//! every iteration.
//!
//! The first failure aborts the cell and is returned as is; the driver never
//! writes report output.

use std::io::{Read, Seek, SeekFrom};

use crate::cli::constants::LEVEL_TRACE;
use crate::timefn::timed;
use crate::{displaylevel, trace_point};

use super::adapter::EntryPoints;
use super::buffers::Buffers;
use super::error::BenchError;
use super::report::CellId;
use super::stats::RunResult;
use super::verify::verify_chunk;

/// Per-cell switches that do not identify the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverOptions {
    pub iterations: u32,
    pub verify: bool,
    pub collect_stats: bool,
    /// Codec-specific extra parameter forwarded to every compress call.
    pub extra: i32,
}

// ── Chunk plan ────────────────────────────────────────────────────────────────

/// Lengths of the chunks one iteration reads: `chunk` bytes each, the last
/// one shorter when `file_size` is not a multiple of `chunk`.
#[derive(Debug, Clone)]
pub struct ChunkLengths {
    remaining: u64,
    chunk: u64,
}

impl Iterator for ChunkLengths {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 || self.chunk == 0 {
            return None;
        }
        let len = self.remaining.min(self.chunk);
        self.remaining -= len;
        Some(len as usize)
    }
}

/// Chunk plan for `file_size` bytes in chunks of at most `chunk` bytes.
pub fn chunk_lengths(file_size: u64, chunk: usize) -> ChunkLengths {
    ChunkLengths {
        remaining: file_size,
        chunk: chunk as u64,
    }
}

// ── Cell loop ─────────────────────────────────────────────────────────────────

/// Runs `opts.iterations` passes of `entry` over `input`.
///
/// Every pass starts from offset 0 of `input`, wherever the reader was left.
/// `file_size` is the byte count of `input` from its start; a reader that
/// turns out shorter fails the cell with an I/O error. With `collect_stats`
/// off the returned result stays at its initial state.
pub fn run_cell<R: Read + Seek>(
    entry: &EntryPoints,
    cell: &CellId<'_>,
    opts: &DriverOptions,
    input: &mut R,
    file_size: u64,
    buffers: &mut Buffers,
) -> Result<RunResult, BenchError> {
    trace_point!("Enter");
    let mut result = RunResult::new();
    let chunk = buffers.chunk_size();
    let (inp, comp, decomp) = buffers.split_mut();

    for iteration in 0..opts.iterations {
        input.seek(SeekFrom::Start(0))?;
        for len in chunk_lengths(file_size, chunk) {
            let src = &mut inp[..len];
            input.read_exact(src)?;
            let src = &*src;

            let (c, c_ns) = timed(|| entry.compress(src, &mut comp[..], cell.level, opts.extra));
            let c_len = c.map_err(|cause| BenchError::CompressionFailed {
                codec: cell.codec,
                level: cell.level,
                cause,
            })?;

            let packed = &comp[..c_len];
            let (d, d_ns) = timed(|| entry.decompress(packed, &mut decomp[..len]));
            let d_len = d.map_err(|cause| BenchError::DecompressionFailed {
                codec: cell.codec,
                level: cell.level,
                cause,
            })?;

            if opts.verify {
                verify_chunk(src, &decomp[..d_len]).map_err(|mismatch| BenchError::VerificationFailed {
                    codec: cell.codec,
                    level: cell.level,
                    file_name: cell.file_name.to_owned(),
                    mismatch,
                })?;
            }
            if opts.collect_stats {
                result.record_chunk(c_len, c_ns, d_len, d_ns);
            }
            displaylevel!(
                LEVEL_TRACE,
                "{} iter {}: {} -> {} -> {} bytes ({} / {} ns)\n",
                cell,
                iteration,
                len,
                c_len,
                d_len,
                c_ns,
                d_ns
            );
        }
        if opts.collect_stats {
            result.finish_iteration();
        }
    }

    trace_point!("Exit");
    Ok(result)
}
