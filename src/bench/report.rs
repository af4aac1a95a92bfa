//! Report emission.
//!
//! Every cell is identified as `<label> [<codec>-<level>] [Filename:<name>]`.
//! [`TextReport`] renders the line formats of the reference bench tool:
//!
//! ```text
//! NATIVE [ZLIB-6] [Filename:corpus.bin] verification: passed
//! NATIVE [ZLIB-6] [Filename:corpus.bin] -------------------------------------
//! Compression:         speed(avg) 97.13 MB/s, time(avg) 10.30 ms, size 312064, speed(best) 99.02 MB/s, time(best) 10.10 ms
//! Decompression:       speed(avg) 402.11 MB/s, time(avg) 2.49 ms, size 1000000, speed(best) 410.77 MB/s, time(best) 2.43 ms
//! Ratio:               31.21
//! ```
//!
//! A failed native call prints `... Compression: failed` (or
//! `Decompression: failed`) in place of the statistics block.

use std::fmt;
use std::io::{self, Write};

use super::codecs::CodecId;
use super::error::Operation;
use super::stats::{CellSummary, OpSummary};

/// Identity of one (codec, level) cell in report output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellId<'a> {
    pub label: &'a str,
    pub codec: CodecId,
    pub level: i32,
    pub file_name: &'a str,
}

impl fmt::Display for CellId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}-{}] [Filename:{}]",
            self.label, self.codec, self.level, self.file_name
        )
    }
}

/// Receives per-cell outcomes in the order the sweep produces them.
pub trait ReportSink {
    /// Round-trip verification outcome; emitted before the statistics.
    fn verification(&mut self, cell: &CellId<'_>, passed: bool) -> io::Result<()>;

    /// A native compress or decompress call failed and the cell was aborted.
    fn failure(&mut self, cell: &CellId<'_>, op: Operation) -> io::Result<()>;

    /// Derived statistics of a completed cell.
    fn statistics(&mut self, cell: &CellId<'_>, summary: &CellSummary) -> io::Result<()>;
}

// ── Text sink ─────────────────────────────────────────────────────────────────

/// Line-oriented report over any writer (stdout in the binary).
#[derive(Debug)]
pub struct TextReport<W: Write> {
    out: W,
}

impl<W: Write> TextReport<W> {
    pub fn new(out: W) -> Self {
        TextReport { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn op_line(&mut self, op: Operation, s: &OpSummary) -> io::Result<()> {
        let tag = format!("{}:", op);
        writeln!(
            self.out,
            "{:<21}speed(avg) {:.2} MB/s, time(avg) {:.2} ms, size {}, speed(best) {:.2} MB/s, time(best) {:.2} ms",
            tag, s.speed_avg, s.time_avg_ms, s.size, s.speed_best, s.time_best_ms
        )
    }
}

impl<W: Write> ReportSink for TextReport<W> {
    fn verification(&mut self, cell: &CellId<'_>, passed: bool) -> io::Result<()> {
        let outcome = if passed { "passed" } else { "failed" };
        writeln!(self.out, "{} verification: {}", cell, outcome)?;
        self.out.flush()
    }

    fn failure(&mut self, cell: &CellId<'_>, op: Operation) -> io::Result<()> {
        writeln!(self.out, "{} {}: failed", cell, op)?;
        self.out.flush()
    }

    fn statistics(&mut self, cell: &CellId<'_>, summary: &CellSummary) -> io::Result<()> {
        writeln!(self.out, "{} -------------------------------------", cell)?;
        self.op_line(Operation::Compress, &summary.compress)?;
        self.op_line(Operation::Decompress, &summary.decompress)?;
        writeln!(self.out, "{:<21}{:.2}", "Ratio:", summary.ratio)?;
        self.out.flush()
    }
}

// ── Recording sink ────────────────────────────────────────────────────────────

/// One recorded report call, owned.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    Verification { codec: CodecId, level: i32, passed: bool },
    Failure { codec: CodecId, level: i32, op: Operation },
    Statistics { codec: CodecId, level: i32, summary: CellSummary },
}

/// Collects events instead of printing them.
impl ReportSink for Vec<ReportEvent> {
    fn verification(&mut self, cell: &CellId<'_>, passed: bool) -> io::Result<()> {
        self.push(ReportEvent::Verification { codec: cell.codec, level: cell.level, passed });
        Ok(())
    }

    fn failure(&mut self, cell: &CellId<'_>, op: Operation) -> io::Result<()> {
        self.push(ReportEvent::Failure { codec: cell.codec, level: cell.level, op });
        Ok(())
    }

    fn statistics(&mut self, cell: &CellId<'_>, summary: &CellSummary) -> io::Result<()> {
        self.push(ReportEvent::Statistics { codec: cell.codec, level: cell.level, summary: *summary });
        Ok(())
    }
}
