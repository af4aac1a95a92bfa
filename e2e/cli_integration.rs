// e2e/cli_integration.rs — black-box tests of the `codec_bench` binary
//
// Runs the built binary with std::process::Command and checks exit status,
// report output on stdout and diagnostics on stderr:
//   0  success (including `-l`)
//   1  runtime error: library load, codec failure, unreadable input
//   2  configuration or usage error

use std::fs;
use std::os::unix::fs::symlink;
use std::path::PathBuf;
use std::process::{Command, Output};

use codec_bench::bench::loader::Library;
use tempfile::TempDir;

/// The `codec_bench` binary produced by Cargo.
fn bench_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_codec_bench"))
}

/// TempDir with a ~4 KB compressible text file.
fn make_temp_input() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.txt");
    fs::write(&input, "Hello, codec bench!\n".repeat(205)).unwrap();
    (dir, input)
}

fn run(args: &[&str]) -> Output {
    Command::new(bench_bin())
        .args(args)
        .output()
        .expect("failed to run codec_bench")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

/// Library directory with `libz.so` linked to the system zlib, if any.
fn zlib_dir() -> Option<TempDir> {
    let target = ["libz.so", "libz.so.1"].iter().find_map(|name| {
        let lib = Library::open(name).ok()?;
        lib.resolved_path("compress2")
    })?;
    let dir = TempDir::new().unwrap();
    symlink(target, dir.path().join("libz.so")).unwrap();
    Some(dir)
}

// ── 1. Listing ────────────────────────────────────────────────────────────────

#[test]
fn test_cli_list_methods() {
    let out = run(&["-l"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("Method Name\tLower Level\tUpper Level"));
    assert!(text.contains("LZ4HC\t\t 1\t\t12"));
    assert!(text.contains("LZ4\t\t NA\t\tNA"));
}

// ── 2. Usage and configuration errors ─────────────────────────────────────────

#[test]
fn test_cli_missing_input_is_usage_error() {
    let out = run(&[]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_cli_unknown_method_is_usage_error() {
    let (_dir, input) = make_temp_input();
    let out = run(&["-ebrotli", input.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stdout(&out).is_empty());
}

#[test]
fn test_cli_all_and_method_conflict() {
    let (_dir, input) = make_temp_input();
    let out = run(&["-a", "-elz4", input.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_cli_method_without_reference_library() {
    let (_dir, input) = make_temp_input();
    let out = run(&["-ezstd:3", input.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("LZ4, LZ4HC, BZIP2, ZLIB"));
}

#[test]
fn test_cli_zero_iterations_rejected() {
    let (_dir, input) = make_temp_input();
    let out = run(&["-i0", "-elz4", input.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_cli_overlong_libdir_rejected() {
    let (_dir, input) = make_temp_input();
    let libdir = "d".repeat(200);
    let out = run(&["--libdir", &libdir, "-ezlib:6", input.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(2));
}

// ── 3. Runtime errors ─────────────────────────────────────────────────────────

#[test]
fn test_cli_missing_library_is_runtime_error() {
    let (_dir, input) = make_temp_input();
    let out = run(&["--libdir", "/nonexistent/codec/libs", "-ezlib:6", input.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
}

#[test]
fn test_cli_bare_verbosity_before_input() {
    let (_dir, input) = make_temp_input();
    let out = run(&["--libdir", "/nonexistent/codec/libs", "-ezlib:6", "-v", input.to_str().unwrap()]);
    // the input is still taken, so the run reaches the loader
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("libz.so"));
}

#[test]
fn test_cli_missing_input_file_is_runtime_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.bin");
    let out = run(&["-ezlib:6", missing.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
}

// ── 4. Benchmark with the system zlib ─────────────────────────────────────────

#[test]
fn test_cli_zlib_verify() {
    let libs = match zlib_dir() {
        Some(d) => d,
        None => {
            eprintln!("skipping: no system zlib");
            return;
        }
    };
    let (_dir, input) = make_temp_input();
    let out = run(&[
        "--libdir",
        libs.path().to_str().unwrap(),
        "-ezlib:6",
        "-t",
        input.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(stdout(&out), "NATIVE [ZLIB-6] [Filename:input.txt] verification: passed\n");
}

#[test]
fn test_cli_zlib_stats_with_label() {
    let libs = match zlib_dir() {
        Some(d) => d,
        None => return,
    };
    let (_dir, input) = make_temp_input();
    let out = run(&[
        "--libdir",
        libs.path().to_str().unwrap(),
        "--label",
        "SYSTEM",
        "-ezlib:1",
        "-i",
        "3",
        "-p",
        input.to_str().unwrap(),
    ]);
    assert!(out.status.success());
    let text = stdout(&out);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "SYSTEM [ZLIB-1] [Filename:input.txt] -------------------------------------");
    assert!(lines[1].starts_with("Compression:"));
    assert!(lines[2].contains(", size 4100, "));
    assert!(lines[3].starts_with("Ratio:"));
}
