// Integration tests for bench/driver.rs: the chunked compress / decompress /
// verify loop of a single (codec, level) cell.
//
// Covered:
//   - inputs smaller than, equal to and spanning several chunks
//   - totals over N iterations are N times a single iteration
//   - best time never exceeds the per-iteration average
//   - stats collection off leaves the result untouched
//   - native failures map to CompressionFailed / DecompressionFailed
//   - corrupted or short output fails verification only when verify is on
//   - a reader shorter than the announced size is an I/O error
//   - a reader left mid-file is read from its start

use std::io::{Cursor, ErrorKind, Seek, SeekFrom};

use codec_bench::bench::adapter::CallError;
use codec_bench::bench::buffers::Buffers;
use codec_bench::bench::driver::{chunk_lengths, run_cell, DriverOptions};
use codec_bench::bench::report::CellId;
use codec_bench::bench::stats::RunResult;
use codec_bench::bench::{BenchError, CodecHandle, CodecId};

use crate::support::*;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn opts(iterations: u32, verify: bool, collect_stats: bool) -> DriverOptions {
    DriverOptions {
        iterations,
        verify,
        collect_stats,
        extra: 0,
    }
}

fn run(handle: &CodecHandle, level: i32, data: &[u8], chunk: usize, o: DriverOptions) -> Result<RunResult, BenchError> {
    let mut input = Cursor::new(data.to_vec());
    let mut buffers = Buffers::with_chunk_size(chunk);
    let cell = CellId {
        label: "NATIVE",
        codec: handle.codec(),
        level,
        file_name: "sample.bin",
    };
    run_cell(handle.entry_points(), &cell, &o, &mut input, data.len() as u64, &mut buffers)
}

/// RLE-compressed size of one pass over `data` in `chunk`-byte pieces.
fn rle_pass_size(data: &[u8], chunk: usize) -> u64 {
    data.chunks(chunk)
        .map(|c| {
            let mut out = vec![0u8; 2 * c.len()];
            rle_encode(c, &mut out).unwrap() as u64
        })
        .sum()
}

// ── Chunk coverage ────────────────────────────────────────────────────────────

#[test]
fn lz4_single_chunk_round_trip() {
    let data = sample(1024);
    let r = run(&lz4_copy(), 0, &data, 1024, opts(1, true, true)).unwrap();
    assert_eq!(r.decompressed_bytes, 1024);
    assert_eq!(r.compressed_bytes, 1024 + 4);
    assert_eq!(r.iterations(), 1);
}

#[test]
fn file_smaller_than_chunk_is_one_call() {
    let data = sample(300);
    let r = run(&zlib_rle(), 1, &data, 4096, opts(1, true, true)).unwrap();
    assert_eq!(r.decompressed_bytes, 300);
    assert_eq!(r.compressed_bytes, rle_pass_size(&data, 4096));
}

#[test]
fn file_of_exactly_one_chunk() {
    let data = sample(4096);
    assert_eq!(chunk_lengths(4096, 4096).count(), 1);
    let r = run(&bzip2_rle(), 9, &data, 4096, opts(1, true, true)).unwrap();
    assert_eq!(r.decompressed_bytes, 4096);
}

#[test]
fn multi_chunk_file_covers_every_byte() {
    let data = sample(2500);
    let r = run(&lz4_hc_copy(), 9, &data, 1000, opts(1, true, true)).unwrap();
    assert_eq!(r.decompressed_bytes, 2500);
    // three chunks, four header bytes each
    assert_eq!(r.compressed_bytes, 2500 + 3 * 4);
}

#[test]
fn empty_input_makes_no_calls() {
    // a failing codec proves nothing was called
    let handle = CodecHandle::in_process(unsafe {
        codec_bench::bench::adapter::EntryPoints::lz4(failing_compress, copy_decompress)
    });
    let r = run(&handle, 0, &[], 0, opts(3, true, true)).unwrap();
    assert_eq!(r.compressed_bytes, 0);
    assert_eq!(r.decompressed_bytes, 0);
    assert_eq!(r.iterations(), 3);
    assert_eq!(r.best_compress(), Some(0));
}

// ── Iterations and statistics ─────────────────────────────────────────────────

#[test]
fn totals_scale_with_iterations() {
    let data = sample(2500);
    let once = run(&zlib_rle(), 6, &data, 1000, opts(1, false, true)).unwrap();
    let ten = run(&zlib_rle(), 6, &data, 1000, opts(10, false, true)).unwrap();

    assert_eq!(once.compressed_bytes, rle_pass_size(&data, 1000));
    assert_eq!(ten.compressed_bytes, 10 * once.compressed_bytes);
    assert_eq!(ten.decompressed_bytes, 10 * 2500);
    assert_eq!(ten.iterations(), 10);

    let best_c = ten.best_compress().unwrap();
    let best_d = ten.best_decompress().unwrap();
    assert!(best_c * 10 <= ten.compress_ns, "best compress exceeds average");
    assert!(best_d * 10 <= ten.decompress_ns, "best decompress exceeds average");
}

#[test]
fn compressed_size_is_stable_across_runs() {
    let data = sample(5000);
    let a = run(&zlib_rle(), 6, &data, 1500, opts(2, false, true)).unwrap();
    let b = run(&zlib_rle(), 6, &data, 1500, opts(2, false, true)).unwrap();
    assert_eq!(a.compressed_bytes, b.compressed_bytes);
}

#[test]
fn stats_off_leaves_result_initial() {
    let data = sample(2048);
    let r = run(&lz4_copy(), 0, &data, 512, opts(4, true, false)).unwrap();
    assert_eq!(r, RunResult::new());
}

// ── Failures ──────────────────────────────────────────────────────────────────

#[test]
fn length_codec_failure_is_compression_failed() {
    let handle = CodecHandle::in_process(unsafe {
        codec_bench::bench::adapter::EntryPoints::lz4_hc(failing_compress_hc, copy_decompress)
    });
    let err = run(&handle, 4, &sample(100), 100, opts(1, false, false)).unwrap_err();
    match err {
        BenchError::CompressionFailed { codec, level, cause } => {
            assert_eq!(codec, CodecId::Lz4Hc);
            assert_eq!(level, 4);
            assert_eq!(cause, CallError::Length(0));
        }
        other => panic!("expected CompressionFailed, got {:?}", other),
    }
}

#[test]
fn status_codec_failure_is_decompression_failed() {
    let handle = CodecHandle::in_process(unsafe {
        codec_bench::bench::adapter::EntryPoints::zlib(rle_compress2, failing_uncompress)
    });
    let err = run(&handle, 6, &sample(100), 100, opts(1, false, false)).unwrap_err();
    assert!(err.is_codec_failure());
    assert!(matches!(
        err,
        BenchError::DecompressionFailed { cause: CallError::Status(s), .. } if s == Z_DATA_ERROR as i64
    ));
    assert_eq!(err.to_string(), "ZLIB-6 decompression failed: returned status -3");
}

#[test]
fn overlong_output_claim_is_rejected() {
    let handle = CodecHandle::in_process(unsafe {
        codec_bench::bench::adapter::EntryPoints::lz4(overflowing_compress, copy_decompress)
    });
    let err = run(&handle, 0, &sample(64), 64, opts(1, false, false)).unwrap_err();
    assert!(matches!(
        err,
        BenchError::CompressionFailed { cause: CallError::Overflow { .. }, .. }
    ));
}

#[test]
fn corrupted_output_fails_verification() {
    let handle = CodecHandle::in_process(unsafe {
        codec_bench::bench::adapter::EntryPoints::lz4(copy_compress, corrupting_decompress)
    });
    let err = run(&handle, 0, &sample(256), 256, opts(1, true, false)).unwrap_err();
    match err {
        BenchError::VerificationFailed { mismatch, file_name, .. } => {
            assert_eq!(mismatch.offset, 0);
            assert_eq!(mismatch.expected_len, 256);
            assert_eq!(mismatch.actual_len, 256);
            assert_ne!(mismatch.expected_digest, mismatch.actual_digest);
            assert_eq!(file_name, "sample.bin");
        }
        other => panic!("expected VerificationFailed, got {:?}", other),
    }
}

#[test]
fn short_output_fails_verification() {
    let handle = CodecHandle::in_process(unsafe {
        codec_bench::bench::adapter::EntryPoints::lz4(copy_compress, truncating_decompress)
    });
    let err = run(&handle, 0, &sample(256), 256, opts(1, true, false)).unwrap_err();
    match err {
        BenchError::VerificationFailed { mismatch, .. } => {
            assert_eq!(mismatch.offset, 255);
            assert_eq!(mismatch.actual_len, 255);
        }
        other => panic!("expected VerificationFailed, got {:?}", other),
    }
}

#[test]
fn corruption_goes_unnoticed_without_verify() {
    let handle = CodecHandle::in_process(unsafe {
        codec_bench::bench::adapter::EntryPoints::lz4(copy_compress, corrupting_decompress)
    });
    assert!(run(&handle, 0, &sample(256), 256, opts(1, false, true)).is_ok());
}

#[test]
fn reader_shorter_than_file_size_is_io_error() {
    let data = sample(100);
    let mut input = Cursor::new(data);
    let mut buffers = Buffers::with_chunk_size(64);
    let handle = lz4_copy();
    let cell = CellId {
        label: "NATIVE",
        codec: CodecId::Lz4,
        level: 0,
        file_name: "shrunk.bin",
    };
    let err = run_cell(handle.entry_points(), &cell, &opts(1, true, false), &mut input, 200, &mut buffers).unwrap_err();
    match err {
        BenchError::Io(e) => assert_eq!(e.kind(), ErrorKind::UnexpectedEof),
        other => panic!("expected Io, got {:?}", other),
    }
}

#[test]
fn reader_left_mid_file_starts_from_offset_zero() {
    let data = sample(100);
    let mut input = Cursor::new(data.clone());
    input.seek(SeekFrom::Start(40)).unwrap();
    let mut buffers = Buffers::with_chunk_size(64);
    let handle = lz4_copy();
    let cell = CellId {
        label: "NATIVE",
        codec: CodecId::Lz4,
        level: 0,
        file_name: "reused.bin",
    };
    let r = run_cell(handle.entry_points(), &cell, &opts(2, true, true), &mut input, 100, &mut buffers).unwrap();
    assert_eq!(r.decompressed_bytes, 2 * 100);
    // copy framing adds a 4-byte header per chunk: 64 + 36 bytes
    assert_eq!(r.compressed_bytes, 2 * (100 + 2 * 4));
}
