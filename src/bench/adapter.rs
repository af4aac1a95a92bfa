//! Entry-point adapter.
//!
//! Each codec family exposes exactly one compress and one decompress entry
//! point, resolved by name from its shared library:
//!
//! | Codec | Compress                   | Decompress                   | Convention        |
//! |-------|----------------------------|------------------------------|-------------------|
//! | LZ4   | `LZ4_compress_default`     | `LZ4_decompress_safe`        | returns length    |
//! | LZ4HC | `LZ4_compress_HC`          | `LZ4_decompress_safe`        | returns length    |
//! | ZLIB  | `compress2`                | `uncompress`                 | status + out-len  |
//! | BZIP2 | `BZ2_bzBuffToBuffCompress` | `BZ2_bzBuffToBuffDecompress` | status + out-len  |
//!
//! *Returns length*: the return value is the produced byte count; zero or
//! negative means failure. *Status + out-len*: the return value is a status
//! code (`Z_OK` / `BZ_OK`, both 0) and the produced byte count is written
//! through a length pointer; a non-OK status is the failure signal whatever
//! the length says.
//!
//! [`EntryPoints`] hides both behind `compress(src, dst, level, extra)` and
//! `decompress(src, dst)`, each returning the produced byte count or a
//! [`CallError`]. Callers never see a native signature.

use std::fmt;
use std::os::raw::{c_char, c_int, c_uint, c_ulong};

use crate::cli::constants::LEVEL_ERR;
use crate::displaylevel;

use super::codecs::CodecId;
use super::error::BenchError;
use super::loader::Library;

// ── Native signatures ─────────────────────────────────────────────────────────

/// `int LZ4_compress_default(const char* src, char* dst, int srcSize, int dstCapacity)`
pub type Lz4CompressFn =
    unsafe extern "C" fn(src: *const c_char, dst: *mut c_char, src_size: c_int, dst_capacity: c_int) -> c_int;

/// `int LZ4_compress_HC(const char* src, char* dst, int srcSize, int dstCapacity, int compressionLevel)`
pub type Lz4HcCompressFn = unsafe extern "C" fn(
    src: *const c_char,
    dst: *mut c_char,
    src_size: c_int,
    dst_capacity: c_int,
    level: c_int,
) -> c_int;

/// `int LZ4_decompress_safe(const char* src, char* dst, int compressedSize, int dstCapacity)`
pub type Lz4DecompressFn = unsafe extern "C" fn(
    src: *const c_char,
    dst: *mut c_char,
    compressed_size: c_int,
    dst_capacity: c_int,
) -> c_int;

/// `int compress2(Bytef* dest, uLongf* destLen, const Bytef* source, uLong sourceLen, int level)`
pub type ZlibCompressFn = unsafe extern "C" fn(
    dest: *mut u8,
    dest_len: *mut c_ulong,
    source: *const u8,
    source_len: c_ulong,
    level: c_int,
) -> c_int;

/// `int uncompress(Bytef* dest, uLongf* destLen, const Bytef* source, uLong sourceLen)`
pub type ZlibDecompressFn =
    unsafe extern "C" fn(dest: *mut u8, dest_len: *mut c_ulong, source: *const u8, source_len: c_ulong) -> c_int;

/// `int BZ2_bzBuffToBuffCompress(char* dest, unsigned int* destLen, char* source,
///  unsigned int sourceLen, int blockSize100k, int verbosity, int workFactor)`
pub type Bz2CompressFn = unsafe extern "C" fn(
    dest: *mut c_char,
    dest_len: *mut c_uint,
    source: *mut c_char,
    source_len: c_uint,
    block_size_100k: c_int,
    verbosity: c_int,
    work_factor: c_int,
) -> c_int;

/// `int BZ2_bzBuffToBuffDecompress(char* dest, unsigned int* destLen, char* source,
///  unsigned int sourceLen, int small, int verbosity)`
pub type Bz2DecompressFn = unsafe extern "C" fn(
    dest: *mut c_char,
    dest_len: *mut c_uint,
    source: *mut c_char,
    source_len: c_uint,
    small: c_int,
    verbosity: c_int,
) -> c_int;

/// Success status shared by zlib (`Z_OK`) and bzip2 (`BZ_OK`).
pub const STATUS_OK: c_int = 0;

// ── Symbol table ──────────────────────────────────────────────────────────────

/// How a family reports success and output size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    ReturnsLength,
    StatusWithLength,
}

/// Entry-point names for one codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolPair {
    pub compress: &'static str,
    pub decompress: &'static str,
    pub convention: Convention,
}

/// Symbol pair for `codec`, or `None` when it has no reference library.
pub fn symbol_pair(codec: CodecId) -> Option<SymbolPair> {
    let pair = match codec {
        CodecId::Lz4 => SymbolPair {
            compress: "LZ4_compress_default",
            decompress: "LZ4_decompress_safe",
            convention: Convention::ReturnsLength,
        },
        CodecId::Lz4Hc => SymbolPair {
            compress: "LZ4_compress_HC",
            decompress: "LZ4_decompress_safe",
            convention: Convention::ReturnsLength,
        },
        CodecId::Zlib => SymbolPair {
            compress: "compress2",
            decompress: "uncompress",
            convention: Convention::StatusWithLength,
        },
        CodecId::Bzip2 => SymbolPair {
            compress: "BZ2_bzBuffToBuffCompress",
            decompress: "BZ2_bzBuffToBuffDecompress",
            convention: Convention::StatusWithLength,
        },
        CodecId::Lzma | CodecId::Snappy | CodecId::Zstd => return None,
    };
    Some(pair)
}

// ── Call failures ─────────────────────────────────────────────────────────────

/// Why one adapted call did not produce output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallError {
    /// Length-returning entry point returned zero or a negative value.
    Length(i64),
    /// Status entry point returned something other than OK.
    Status(i64),
    /// An input length does not fit the native length type; not called.
    ArgumentTooLarge { len: usize, max: u64 },
    /// Reported output exceeds the capacity passed in.
    Overflow { produced: u64, capacity: usize },
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallError::Length(r) => write!(f, "returned length {}", r),
            CallError::Status(s) => write!(f, "returned status {}", s),
            CallError::ArgumentTooLarge { len, max } => {
                write!(f, "input of {} bytes exceeds native limit {}", len, max)
            }
            CallError::Overflow { produced, capacity } => {
                write!(f, "reported {} bytes for a {}-byte buffer", produced, capacity)
            }
        }
    }
}

fn input_len<T: TryFrom<usize> + TryInto<u64>>(len: usize, max: T) -> Result<T, CallError> {
    T::try_from(len).map_err(|_| CallError::ArgumentTooLarge {
        len,
        max: max.try_into().unwrap_or(u64::MAX),
    })
}

/// Capacities larger than the native type can express are clamped: the
/// callee simply sees less room.
fn capacity<T: TryFrom<usize>>(len: usize, max: T) -> T {
    T::try_from(len).unwrap_or(max)
}

/// Interprets a length-returning result.
fn from_length(ret: c_int, capacity: usize) -> Result<usize, CallError> {
    if ret <= 0 {
        return Err(CallError::Length(ret as i64));
    }
    let produced = ret as usize;
    if produced > capacity {
        return Err(CallError::Overflow { produced: produced as u64, capacity });
    }
    Ok(produced)
}

/// Interprets a status + out-length result.
fn from_status(status: c_int, written: u64, capacity: usize) -> Result<usize, CallError> {
    if status != STATUS_OK {
        return Err(CallError::Status(status as i64));
    }
    if written > capacity as u64 {
        return Err(CallError::Overflow { produced: written, capacity });
    }
    Ok(written as usize)
}

// ── Entry points ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum LengthFns {
    Lz4 { compress: Lz4CompressFn, decompress: Lz4DecompressFn },
    Lz4Hc { compress: Lz4HcCompressFn, decompress: Lz4DecompressFn },
}

#[derive(Clone, Copy)]
enum StatusFns {
    Zlib { compress: ZlibCompressFn, decompress: ZlibDecompressFn },
    Bzip2 { compress: Bz2CompressFn, decompress: Bz2DecompressFn },
}

/// One variant per calling convention.
#[derive(Clone, Copy)]
enum Fns {
    ReturnsLength(LengthFns),
    Status(StatusFns),
}

/// A resolved compress/decompress pair behind the uniform call shape.
///
/// Holds raw function pointers: it must not outlive the library they were
/// resolved from. [`super::context::CodecHandle`] keeps both together.
pub struct EntryPoints {
    codec: CodecId,
    fns: Fns,
}

impl fmt::Debug for EntryPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPoints")
            .field("codec", &self.codec)
            .field("convention", &self.convention())
            .finish()
    }
}

impl EntryPoints {
    /// Wraps an LZ4-style pair.
    ///
    /// # Safety
    /// Both functions must implement the documented native contract and stay
    /// callable for the lifetime of the returned value.
    pub unsafe fn lz4(compress: Lz4CompressFn, decompress: Lz4DecompressFn) -> Self {
        EntryPoints {
            codec: CodecId::Lz4,
            fns: Fns::ReturnsLength(LengthFns::Lz4 { compress, decompress }),
        }
    }

    /// Wraps an LZ4-HC pair. See [`EntryPoints::lz4`] for the safety contract.
    pub unsafe fn lz4_hc(compress: Lz4HcCompressFn, decompress: Lz4DecompressFn) -> Self {
        EntryPoints {
            codec: CodecId::Lz4Hc,
            fns: Fns::ReturnsLength(LengthFns::Lz4Hc { compress, decompress }),
        }
    }

    /// Wraps a zlib pair. See [`EntryPoints::lz4`] for the safety contract.
    pub unsafe fn zlib(compress: ZlibCompressFn, decompress: ZlibDecompressFn) -> Self {
        EntryPoints {
            codec: CodecId::Zlib,
            fns: Fns::Status(StatusFns::Zlib { compress, decompress }),
        }
    }

    /// Wraps a bzip2 pair. See [`EntryPoints::lz4`] for the safety contract.
    pub unsafe fn bzip2(compress: Bz2CompressFn, decompress: Bz2DecompressFn) -> Self {
        EntryPoints {
            codec: CodecId::Bzip2,
            fns: Fns::Status(StatusFns::Bzip2 { compress, decompress }),
        }
    }

    /// Resolves both entry points for `codec` from `lib`; fails if either is absent.
    ///
    /// The result borrows nothing but is only valid while `lib` stays open.
    pub(crate) fn resolve(lib: &Library, codec: CodecId) -> Result<EntryPoints, BenchError> {
        let pair = symbol_pair(codec).ok_or(BenchError::UnsupportedCodec(codec))?;
        let library = codec.library_file().unwrap_or("");
        let missing = |symbol: &'static str| {
            move |reason: String| {
                displaylevel!(
                    LEVEL_ERR,
                    "Error in loading symbols from dynamic library: [{}]\n",
                    reason
                );
                BenchError::Symbol { library, symbol, reason }
            }
        };

        // SAFETY: each lookup names the native function whose C prototype the
        // target type alias spells out (see the table in the module docs).
        unsafe {
            let fns = match codec {
                CodecId::Lz4 => Fns::ReturnsLength(LengthFns::Lz4 {
                    compress: lib.symbol(pair.compress).map_err(missing(pair.compress))?,
                    decompress: lib.symbol(pair.decompress).map_err(missing(pair.decompress))?,
                }),
                CodecId::Lz4Hc => Fns::ReturnsLength(LengthFns::Lz4Hc {
                    compress: lib.symbol(pair.compress).map_err(missing(pair.compress))?,
                    decompress: lib.symbol(pair.decompress).map_err(missing(pair.decompress))?,
                }),
                CodecId::Zlib => Fns::Status(StatusFns::Zlib {
                    compress: lib.symbol(pair.compress).map_err(missing(pair.compress))?,
                    decompress: lib.symbol(pair.decompress).map_err(missing(pair.decompress))?,
                }),
                CodecId::Bzip2 => Fns::Status(StatusFns::Bzip2 {
                    compress: lib.symbol(pair.compress).map_err(missing(pair.compress))?,
                    decompress: lib.symbol(pair.decompress).map_err(missing(pair.decompress))?,
                }),
                CodecId::Lzma | CodecId::Snappy | CodecId::Zstd => {
                    return Err(BenchError::UnsupportedCodec(codec))
                }
            };
            Ok(EntryPoints { codec, fns })
        }
    }

    pub fn codec(&self) -> CodecId {
        self.codec
    }

    pub fn convention(&self) -> Convention {
        match self.fns {
            Fns::ReturnsLength(_) => Convention::ReturnsLength,
            Fns::Status(_) => Convention::StatusWithLength,
        }
    }

    /// Compresses `src` into `dst`, returning the compressed length.
    ///
    /// `level` is ignored by plain LZ4. `extra` is the BZIP2 `workFactor`
    /// and ignored elsewhere.
    pub fn compress(&self, src: &[u8], dst: &mut [u8], level: i32, extra: i32) -> Result<usize, CallError> {
        let cap = dst.len();
        // SAFETY: the pointers come from live slices and the lengths passed
        // never exceed those slices; the callee writes at most `cap` bytes
        // into `dst` and only reads `src`. bzip2 takes a non-const source
        // pointer but does not write through it.
        unsafe {
            match self.fns {
                Fns::ReturnsLength(LengthFns::Lz4 { compress, .. }) => {
                    let n = input_len(src.len(), c_int::MAX)?;
                    let ret = compress(
                        src.as_ptr() as *const c_char,
                        dst.as_mut_ptr() as *mut c_char,
                        n,
                        capacity(cap, c_int::MAX),
                    );
                    from_length(ret, cap)
                }
                Fns::ReturnsLength(LengthFns::Lz4Hc { compress, .. }) => {
                    let n = input_len(src.len(), c_int::MAX)?;
                    let ret = compress(
                        src.as_ptr() as *const c_char,
                        dst.as_mut_ptr() as *mut c_char,
                        n,
                        capacity(cap, c_int::MAX),
                        level,
                    );
                    from_length(ret, cap)
                }
                Fns::Status(StatusFns::Zlib { compress, .. }) => {
                    let n = input_len(src.len(), c_ulong::MAX)?;
                    let mut out_len: c_ulong = capacity(cap, c_ulong::MAX);
                    let status = compress(dst.as_mut_ptr(), &mut out_len, src.as_ptr(), n, level);
                    from_status(status, out_len as u64, cap)
                }
                Fns::Status(StatusFns::Bzip2 { compress, .. }) => {
                    let n = input_len(src.len(), c_uint::MAX)?;
                    let mut out_len: c_uint = capacity(cap, c_uint::MAX);
                    let status = compress(
                        dst.as_mut_ptr() as *mut c_char,
                        &mut out_len,
                        src.as_ptr() as *mut c_char,
                        n,
                        level,
                        0,
                        extra,
                    );
                    from_status(status, out_len as u64, cap)
                }
            }
        }
    }

    /// Decompresses `src` into `dst`, returning the decompressed length.
    ///
    /// `dst.len()` is the capacity handed to the native call.
    pub fn decompress(&self, src: &[u8], dst: &mut [u8]) -> Result<usize, CallError> {
        let cap = dst.len();
        // SAFETY: as in `compress`.
        unsafe {
            match self.fns {
                Fns::ReturnsLength(LengthFns::Lz4 { decompress, .. })
                | Fns::ReturnsLength(LengthFns::Lz4Hc { decompress, .. }) => {
                    let n = input_len(src.len(), c_int::MAX)?;
                    let ret = decompress(
                        src.as_ptr() as *const c_char,
                        dst.as_mut_ptr() as *mut c_char,
                        n,
                        capacity(cap, c_int::MAX),
                    );
                    from_length(ret, cap)
                }
                Fns::Status(StatusFns::Zlib { decompress, .. }) => {
                    let n = input_len(src.len(), c_ulong::MAX)?;
                    let mut out_len: c_ulong = capacity(cap, c_ulong::MAX);
                    let status = decompress(dst.as_mut_ptr(), &mut out_len, src.as_ptr(), n);
                    from_status(status, out_len as u64, cap)
                }
                Fns::Status(StatusFns::Bzip2 { decompress, .. }) => {
                    let n = input_len(src.len(), c_uint::MAX)?;
                    let mut out_len: c_uint = capacity(cap, c_uint::MAX);
                    let status = decompress(
                        dst.as_mut_ptr() as *mut c_char,
                        &mut out_len,
                        src.as_ptr() as *mut c_char,
                        n,
                        0,
                        0,
                    );
                    from_status(status, out_len as u64, cap)
                }
            }
        }
    }
}
