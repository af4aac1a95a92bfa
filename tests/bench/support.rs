// Shared fixtures for the bench integration tests: in-process stand-ins for
// the native codec entry points, plus sample inputs.
//
// The fakes follow the native calling conventions exactly:
//   - LZ4 / LZ4HC style: length-returning, 0 or negative on failure
//   - zlib / bzip2 style: status return, produced size written through the
//     length pointer
//
// `copy_*` frames the chunk as a 4-byte little-endian length plus the raw
// bytes. `rle_*` is a (count, byte) run-length code, so compressible inputs
// really shrink and the compressed size depends only on the input.

#![allow(dead_code)]

use std::os::raw::{c_char, c_int, c_uint, c_ulong};
use std::slice;

use codec_bench::bench::adapter::EntryPoints;
use codec_bench::bench::loader::LibraryDir;
use codec_bench::bench::{BenchContext, CodecHandle};

pub const Z_OK: c_int = 0;
pub const Z_BUF_ERROR: c_int = -5;
pub const Z_DATA_ERROR: c_int = -3;
pub const BZ_OUTBUFF_FULL: c_int = -8;

// ── Framing helpers ───────────────────────────────────────────────────────────

fn copy_encode(src: &[u8], dst: &mut [u8]) -> Option<usize> {
    let total = src.len() + 4;
    if src.is_empty() || total > dst.len() {
        return None;
    }
    dst[..4].copy_from_slice(&(src.len() as u32).to_le_bytes());
    dst[4..total].copy_from_slice(src);
    Some(total)
}

fn copy_decode(src: &[u8], dst: &mut [u8]) -> Option<usize> {
    if src.len() < 4 {
        return None;
    }
    let n = u32::from_le_bytes([src[0], src[1], src[2], src[3]]) as usize;
    if n > dst.len() || 4 + n > src.len() {
        return None;
    }
    dst[..n].copy_from_slice(&src[4..4 + n]);
    Some(n)
}

pub fn rle_encode(src: &[u8], dst: &mut [u8]) -> Option<usize> {
    let mut out = 0;
    let mut i = 0;
    while i < src.len() {
        let byte = src[i];
        let mut run = 1;
        while i + run < src.len() && src[i + run] == byte && run < 255 {
            run += 1;
        }
        if out + 2 > dst.len() {
            return None;
        }
        dst[out] = run as u8;
        dst[out + 1] = byte;
        out += 2;
        i += run;
    }
    Some(out)
}

pub fn rle_decode(src: &[u8], dst: &mut [u8]) -> Option<usize> {
    if src.len() % 2 != 0 {
        return None;
    }
    let mut out = 0;
    for pair in src.chunks_exact(2) {
        let run = pair[0] as usize;
        if out + run > dst.len() {
            return None;
        }
        dst[out..out + run].fill(pair[1]);
        out += run;
    }
    Some(out)
}

unsafe fn input<'a>(ptr: *const u8, len: usize) -> &'a [u8] {
    if len == 0 {
        &[]
    } else {
        slice::from_raw_parts(ptr, len)
    }
}

unsafe fn output<'a>(ptr: *mut u8, len: usize) -> &'a mut [u8] {
    if len == 0 {
        &mut []
    } else {
        slice::from_raw_parts_mut(ptr, len)
    }
}

// ── LZ4-style fakes ───────────────────────────────────────────────────────────

pub unsafe extern "C" fn copy_compress(src: *const c_char, dst: *mut c_char, src_size: c_int, cap: c_int) -> c_int {
    if src_size < 0 || cap < 0 {
        return 0;
    }
    let src = input(src as *const u8, src_size as usize);
    let dst = output(dst as *mut u8, cap as usize);
    copy_encode(src, dst).map_or(0, |n| n as c_int)
}

pub unsafe extern "C" fn copy_compress_hc(
    src: *const c_char,
    dst: *mut c_char,
    src_size: c_int,
    cap: c_int,
    _level: c_int,
) -> c_int {
    copy_compress(src, dst, src_size, cap)
}

pub unsafe extern "C" fn copy_decompress(src: *const c_char, dst: *mut c_char, compressed: c_int, cap: c_int) -> c_int {
    if compressed < 0 || cap < 0 {
        return -1;
    }
    let src = input(src as *const u8, compressed as usize);
    let dst = output(dst as *mut u8, cap as usize);
    copy_decode(src, dst).map_or(-1, |n| n as c_int)
}

/// Always fails, like `LZ4_compress_default` with a too-small buffer.
pub unsafe extern "C" fn failing_compress(_: *const c_char, _: *mut c_char, _: c_int, _: c_int) -> c_int {
    0
}

pub unsafe extern "C" fn failing_compress_hc(_: *const c_char, _: *mut c_char, _: c_int, _: c_int, _: c_int) -> c_int {
    0
}

/// Claims one byte more than it was given room for.
pub unsafe extern "C" fn overflowing_compress(_: *const c_char, _: *mut c_char, _: c_int, cap: c_int) -> c_int {
    cap.saturating_add(1)
}

/// Decodes correctly, then flips the first output byte.
pub unsafe extern "C" fn corrupting_decompress(src: *const c_char, dst: *mut c_char, compressed: c_int, cap: c_int) -> c_int {
    let n = copy_decompress(src, dst, compressed, cap);
    if n > 0 {
        *dst = !*dst;
    }
    n
}

/// Decodes correctly but reports one byte less.
pub unsafe extern "C" fn truncating_decompress(src: *const c_char, dst: *mut c_char, compressed: c_int, cap: c_int) -> c_int {
    let n = copy_decompress(src, dst, compressed, cap);
    if n > 1 {
        n - 1
    } else {
        n
    }
}

// ── zlib-style fakes ──────────────────────────────────────────────────────────

pub unsafe extern "C" fn rle_compress2(
    dest: *mut u8,
    dest_len: *mut c_ulong,
    source: *const u8,
    source_len: c_ulong,
    _level: c_int,
) -> c_int {
    let src = input(source, source_len as usize);
    let dst = output(dest, *dest_len as usize);
    match rle_encode(src, dst) {
        Some(n) => {
            *dest_len = n as c_ulong;
            Z_OK
        }
        None => Z_BUF_ERROR,
    }
}

pub unsafe extern "C" fn rle_uncompress(dest: *mut u8, dest_len: *mut c_ulong, source: *const u8, source_len: c_ulong) -> c_int {
    let src = input(source, source_len as usize);
    let dst = output(dest, *dest_len as usize);
    match rle_decode(src, dst) {
        Some(n) => {
            *dest_len = n as c_ulong;
            Z_OK
        }
        None => Z_DATA_ERROR,
    }
}

/// Reports `Z_DATA_ERROR` while leaving a plausible length behind.
pub unsafe extern "C" fn failing_uncompress(_: *mut u8, dest_len: *mut c_ulong, _: *const u8, source_len: c_ulong) -> c_int {
    *dest_len = source_len;
    Z_DATA_ERROR
}

// ── bzip2-style fakes ─────────────────────────────────────────────────────────

pub unsafe extern "C" fn rle_bz_compress(
    dest: *mut c_char,
    dest_len: *mut c_uint,
    source: *mut c_char,
    source_len: c_uint,
    _block_size_100k: c_int,
    _verbosity: c_int,
    _work_factor: c_int,
) -> c_int {
    let src = input(source as *const u8, source_len as usize);
    let dst = output(dest as *mut u8, *dest_len as usize);
    match rle_encode(src, dst) {
        Some(n) => {
            *dest_len = n as c_uint;
            0
        }
        None => BZ_OUTBUFF_FULL,
    }
}

pub unsafe extern "C" fn rle_bz_decompress(
    dest: *mut c_char,
    dest_len: *mut c_uint,
    source: *mut c_char,
    source_len: c_uint,
    _small: c_int,
    _verbosity: c_int,
) -> c_int {
    let src = input(source as *const u8, source_len as usize);
    let dst = output(dest as *mut u8, *dest_len as usize);
    match rle_decode(src, dst) {
        Some(n) => {
            *dest_len = n as c_uint;
            0
        }
        None => BZ_OUTBUFF_FULL,
    }
}

// ── Handles ───────────────────────────────────────────────────────────────────

pub fn lz4_copy() -> CodecHandle {
    CodecHandle::in_process(unsafe { EntryPoints::lz4(copy_compress, copy_decompress) })
}

pub fn lz4_hc_copy() -> CodecHandle {
    CodecHandle::in_process(unsafe { EntryPoints::lz4_hc(copy_compress_hc, copy_decompress) })
}

pub fn zlib_rle() -> CodecHandle {
    CodecHandle::in_process(unsafe { EntryPoints::zlib(rle_compress2, rle_uncompress) })
}

pub fn bzip2_rle() -> CodecHandle {
    CodecHandle::in_process(unsafe { EntryPoints::bzip2(rle_bz_compress, rle_bz_decompress) })
}

/// Context holding `handles` and nothing else.
pub fn context_with(handles: impl IntoIterator<Item = CodecHandle>) -> BenchContext {
    let mut ctx = BenchContext::new(LibraryDir::system_default());
    for handle in handles {
        ctx.install(handle);
    }
    ctx
}

/// Context with a working fake for every reference-supported codec.
pub fn full_context() -> BenchContext {
    context_with([lz4_copy(), lz4_hc_copy(), bzip2_rle(), zlib_rle()])
}

// ── Inputs ────────────────────────────────────────────────────────────────────

/// `len` bytes of short runs: compressible under RLE, never all one byte.
pub fn sample(len: usize) -> Vec<u8> {
    (0..len).map(|i| b'a' + ((i / 13) % 7) as u8).collect()
}
