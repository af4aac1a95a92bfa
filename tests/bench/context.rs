// Integration tests for bench/loader.rs and bench/context.rs against real
// shared libraries.
//
// The reference codec libraries are only present as unversioned `.so` names
// on machines with the development packages installed, so these tests build
// a private library directory of symlinks to whatever versioned objects the
// system has (`libz.so.1`, `liblz4.so.1`, ...). A test whose library cannot be
// found prints a note and returns early.
//
// Covered:
//   - dlopen / dlsym / dladdr on the C library
//   - a library lacking the codec's entry points is a Symbol error
//   - LZ4 and LZ4HC share one library and teardown closes it once
//   - end-to-end benchmark of a temp file with the system zlib / bzip2 / lz4

use std::io::Write;
use std::os::unix::fs::symlink;
use std::path::Path;

use codec_bench::bench::loader::{Library, LibraryDir};
use codec_bench::bench::report::ReportEvent;
use codec_bench::bench::{bench_file_with, BenchConfig, BenchContext, BenchError, CodecId};
use tempfile::{NamedTempFile, TempDir};

use crate::support::sample;

// ── Helpers ───────────────────────────────────────────────────────────────────

const LIBC: &str = "libc.so.6";

/// On-disk path of the first loadable candidate, found through `symbol`.
fn system_object(candidates: &[&str], symbol: &str) -> Option<String> {
    candidates.iter().find_map(|name| {
        let lib = Library::open(name).ok()?;
        lib.resolved_path(symbol)
    })
}

/// Links `target` into `dir` under `file`.
fn link(dir: &Path, file: &str, target: &str) {
    symlink(target, dir.join(file)).expect("symlink");
}

/// Temp library directory serving `file` from the system object, or `None`.
fn library_dir_for(file: &str, candidates: &[&str], symbol: &str) -> Option<TempDir> {
    let target = match system_object(candidates, symbol) {
        Some(t) => t,
        None => {
            eprintln!("skipping: none of {:?} is loadable", candidates);
            return None;
        }
    };
    let dir = TempDir::new().expect("tmp dir");
    link(dir.path(), file, &target);
    Some(dir)
}

fn zlib_dir() -> Option<TempDir> {
    library_dir_for("libz.so", &["libz.so", "libz.so.1"], "compress2")
}

fn bzip2_dir() -> Option<TempDir> {
    library_dir_for("libbz2.so", &["libbz2.so", "libbz2.so.1.0", "libbz2.so.1"], "BZ2_bzBuffToBuffCompress")
}

fn lz4_dir() -> Option<TempDir> {
    library_dir_for("liblz4.so", &["liblz4.so", "liblz4.so.1"], "LZ4_compress_HC")
}

fn input_file(data: &[u8]) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().expect("tmp file");
    tmp.write_all(data).expect("write tmp file");
    tmp.flush().expect("flush tmp file");
    tmp
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[test]
fn libc_symbols_resolve() {
    let lib = match Library::open(LIBC) {
        Ok(lib) => lib,
        Err(e) => {
            eprintln!("skipping: {}", e);
            return;
        }
    };
    assert_eq!(lib.path(), LIBC);
    type StrlenFn = unsafe extern "C" fn(*const std::os::raw::c_char) -> usize;
    let strlen: StrlenFn = unsafe { lib.symbol("strlen") }.expect("strlen");
    let n = unsafe { strlen(b"codec\0".as_ptr() as *const _) };
    assert_eq!(n, 5);

    let path = lib.resolved_path("strlen").expect("dladdr");
    assert!(path.contains("libc"), "unexpected path {}", path);
    assert!(lib.close().is_ok());
}

#[test]
fn missing_symbol_is_reported() {
    let lib = match Library::open(LIBC) {
        Ok(lib) => lib,
        Err(_) => return,
    };
    type VoidFn = unsafe extern "C" fn();
    let err = unsafe { lib.symbol::<VoidFn>("__codec_bench_no_such_symbol") }.unwrap_err();
    assert!(!err.is_empty());
}

#[test]
fn library_without_entry_points_is_symbol_error() {
    // the C library under a codec's file name resolves nothing it needs
    let dir = match library_dir_for("libz.so", &[LIBC], "strlen") {
        Some(d) => d,
        None => return,
    };
    let mut ctx = BenchContext::new(LibraryDir::new(dir.path().to_str().unwrap()).unwrap());
    let err = ctx.setup(&[CodecId::Zlib]).unwrap_err();
    match err {
        BenchError::Symbol { library, symbol, .. } => {
            assert_eq!(library, "libz.so");
            assert_eq!(symbol, "compress2");
        }
        other => panic!("expected Symbol, got {:?}", other),
    }
    assert!(!ctx.is_open(CodecId::Zlib));
    assert_eq!(ctx.teardown(), 0);
}

// ── Context ───────────────────────────────────────────────────────────────────

#[test]
fn lz4_and_lz4hc_share_one_library() {
    let dir = match lz4_dir() {
        Some(d) => d,
        None => return,
    };
    let mut ctx = BenchContext::new(LibraryDir::new(dir.path().to_str().unwrap()).unwrap());
    ctx.setup(&[CodecId::Lz4, CodecId::Lz4Hc]).unwrap();

    let lz4 = ctx.handle(CodecId::Lz4).unwrap();
    let hc = ctx.handle(CodecId::Lz4Hc).unwrap();
    assert!(lz4.shares_library_with(hc));
    assert_eq!(lz4.library_path(), hc.library_path());
    assert_eq!(ctx.open_codecs().collect::<Vec<_>>(), vec![CodecId::Lz4, CodecId::Lz4Hc]);

    assert_eq!(ctx.teardown(), 1);
    assert_eq!(ctx.teardown(), 0);
    assert_eq!(ctx.open_codecs().count(), 0);
}

#[test]
fn partial_setup_is_torn_down() {
    let dir = match zlib_dir() {
        Some(d) => d,
        None => return,
    };
    // libz.so is present, libbz2.so is not
    let mut ctx = BenchContext::new(LibraryDir::new(dir.path().to_str().unwrap()).unwrap());
    let err = ctx.setup(&[CodecId::Zlib, CodecId::Bzip2]).unwrap_err();
    assert!(matches!(err, BenchError::Load { .. }));
    assert!(ctx.is_open(CodecId::Zlib));
    assert!(!ctx.is_open(CodecId::Bzip2));
    assert_eq!(ctx.teardown(), 1);
}

// ── End to end ────────────────────────────────────────────────────────────────

fn bench_with_system(dir: &TempDir, codec: CodecId, level: i32, data: &[u8]) -> Vec<ReportEvent> {
    let tmp = input_file(data);
    let mut config = BenchConfig::default();
    config
        .set_codec(codec)
        .set_level(level)
        .set_iterations(2)
        .set_mem_limit(16 * 1024)
        .set_verify(true)
        .set_print_stats(true)
        .set_library_dir(dir.path().to_str().unwrap());
    let mut events: Vec<ReportEvent> = Vec::new();
    let done = bench_file_with(tmp.path(), &config, &mut events).unwrap();
    assert_eq!(done, 1);
    events
}

fn assert_round_trip(events: &[ReportEvent], size: u64) {
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], ReportEvent::Verification { passed: true, .. }));
    match &events[1] {
        ReportEvent::Statistics { summary, .. } => {
            assert_eq!(summary.decompress.size, size);
            assert!(summary.compress.size > 0);
            assert!(summary.ratio < 100.0, "sample data should compress");
        }
        other => panic!("expected statistics, got {:?}", other),
    }
}

#[test]
fn system_zlib_round_trip() {
    let dir = match zlib_dir() {
        Some(d) => d,
        None => return,
    };
    let data = sample(40 * 1024);
    assert_round_trip(&bench_with_system(&dir, CodecId::Zlib, 6, &data), data.len() as u64);
}

#[test]
fn system_bzip2_round_trip() {
    let dir = match bzip2_dir() {
        Some(d) => d,
        None => return,
    };
    let data = sample(40 * 1024);
    assert_round_trip(&bench_with_system(&dir, CodecId::Bzip2, 9, &data), data.len() as u64);
}

#[test]
fn system_lz4hc_round_trip() {
    let dir = match lz4_dir() {
        Some(d) => d,
        None => return,
    };
    let data = sample(40 * 1024);
    assert_round_trip(&bench_with_system(&dir, CodecId::Lz4Hc, 9, &data), data.len() as u64);
}
