//! Sweep controller: plans the (codec, level) cells of a run and executes
//! them in order.
//!
//! Single-codec mode sweeps one codec over either its full descriptor range
//! or the single level given. All-codecs mode visits every codec with a
//! reference library in table order; the rest are skipped without comment.
//!
//! Each cell starts from a fresh [`RunResult`]. Report output for a cell is
//! written before its failure, if any, is returned, and the sweep stops at
//! the first failed cell.

use std::io::{Read, Seek};

use crate::cli::constants::{LEVEL_DEBUG, LEVEL_ERR};
use crate::{displaylevel, trace_point};

use super::buffers::Buffers;
use super::codecs::CodecId;
use super::config::{BenchConfig, CodecSelection};
use super::context::BenchContext;
use super::driver::{run_cell, DriverOptions};
use super::error::BenchError;
use super::report::{CellId, ReportSink};

/// One planned cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub codec: CodecId,
    pub level: i32,
    pub extra: i32,
}

/// Every cell `config` asks for, in execution order.
///
/// An explicit level outside the codec's descriptor range is kept (the
/// caller asked for it) and reported as a warning.
pub fn plan_cells(config: &BenchConfig) -> Vec<Cell> {
    if let CodecSelection::Single(codec) = config.codec {
        let range = config.level_range(codec);
        let desc = codec.descriptor();
        if !desc.levels().contains(range.start()) {
            displaylevel!(
                LEVEL_ERR,
                "warning: level {} is outside {}'s range {}..={}\n",
                range.start(),
                codec,
                desc.level_low,
                desc.level_high
            );
        }
    }

    config
        .selected_codecs()
        .into_iter()
        .filter(|c| c.is_reference_supported())
        .flat_map(|codec| {
            let extra = config.extra_for(codec);
            config
                .level_range(codec)
                .map(move |level| Cell { codec, level, extra })
        })
        .collect()
}

/// Runs every planned cell against the handles in `ctx`.
///
/// Returns the number of cells completed. A handle missing from `ctx` fails
/// the cell as a load error.
pub fn run_sweep<R: Read + Seek, S: ReportSink + ?Sized>(
    ctx: &BenchContext,
    config: &BenchConfig,
    input: &mut R,
    file_size: u64,
    file_name: &str,
    buffers: &mut Buffers,
    sink: &mut S,
) -> Result<usize, BenchError> {
    trace_point!("Enter");
    let iterations = config.effective_iterations();
    let mut completed = 0;

    for cell in plan_cells(config) {
        let handle = ctx.handle(cell.codec).ok_or_else(|| BenchError::Load {
            library: cell.codec.library_file().unwrap_or(cell.codec.name()).to_owned(),
            reason: format!("{} was not set up for this run", cell.codec),
        })?;
        let id = CellId {
            label: &config.label,
            codec: cell.codec,
            level: cell.level,
            file_name,
        };
        let opts = DriverOptions {
            iterations,
            verify: config.verify,
            collect_stats: config.print_stats,
            extra: cell.extra,
        };
        displaylevel!(LEVEL_DEBUG, "{} starting ({} iterations)\n", id, iterations);

        match run_cell(handle.entry_points(), &id, &opts, input, file_size, buffers) {
            Ok(result) => {
                if config.verify {
                    sink.verification(&id, true)?;
                }
                if config.print_stats {
                    sink.statistics(&id, &result.summarize(file_size, iterations))?;
                }
                completed += 1;
            }
            Err(err) => {
                if let BenchError::VerificationFailed { .. } = err {
                    sink.verification(&id, false)?;
                } else if let Some(op) = err.operation() {
                    sink.failure(&id, op)?;
                }
                displaylevel!(LEVEL_ERR, "{}\n", err);
                trace_point!("Exit");
                return Err(err);
            }
        }
    }

    trace_point!("Exit");
    Ok(completed)
}
