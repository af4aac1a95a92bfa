//! Error taxonomy for a benchmark run.
//!
//! Configuration errors are detected before any native call and allocate no
//! resources. Everything else is a runtime error: the library or one of its
//! entry points could not be resolved, a codec call reported failure, the
//! round trip did not reproduce the input, or the input file could not be
//! read. Each class is a distinct variant so callers can tell them apart.

use std::fmt;
use std::io;

use super::adapter::CallError;
use super::codecs::CodecId;
use super::verify::Mismatch;

/// Coarse classification the CLI layer maps to an exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Configuration,
    Runtime,
}

/// Which half of the round trip failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Compress,
    Decompress,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Compress => f.write_str("Compression"),
            Operation::Decompress => f.write_str("Decompression"),
        }
    }
}

#[derive(Debug)]
pub enum BenchError {
    /// Library directory does not fit `MAX_FILENAME_LEN` (with separator and NUL).
    LibraryDirTooLong { len: usize, max: usize },
    /// Codec has no reference-library counterpart.
    UnsupportedCodec(CodecId),
    /// Iteration count of zero.
    InvalidIterations(u32),
    /// Memory limit of zero bytes.
    InvalidMemLimit(usize),
    /// Shared library could not be opened.
    Load { library: String, reason: String },
    /// A required entry point is missing from an opened library.
    Symbol {
        library: &'static str,
        symbol: &'static str,
        reason: String,
    },
    /// The native compress call reported failure, claimed more output than
    /// it was given room for, or was refused because a length does not fit
    /// the native datatype.
    CompressionFailed { codec: CodecId, level: i32, cause: CallError },
    /// Same as `CompressionFailed`, for the decompress call.
    DecompressionFailed { codec: CodecId, level: i32, cause: CallError },
    /// Decompressed bytes differ from the source chunk.
    VerificationFailed {
        codec: CodecId,
        level: i32,
        file_name: String,
        mismatch: Mismatch,
    },
    /// Reading or seeking the input failed.
    Io(io::Error),
}

impl BenchError {
    pub fn class(&self) -> ErrorClass {
        match self {
            BenchError::LibraryDirTooLong { .. }
            | BenchError::UnsupportedCodec(_)
            | BenchError::InvalidIterations(_)
            | BenchError::InvalidMemLimit(_) => ErrorClass::Configuration,
            _ => ErrorClass::Runtime,
        }
    }

    #[inline]
    pub fn is_configuration(&self) -> bool {
        self.class() == ErrorClass::Configuration
    }

    /// `true` for a failed native compress or decompress call.
    pub fn is_codec_failure(&self) -> bool {
        matches!(
            self,
            BenchError::CompressionFailed { .. } | BenchError::DecompressionFailed { .. }
        )
    }

    /// The failed half of the round trip, for codec failures.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            BenchError::CompressionFailed { .. } => Some(Operation::Compress),
            BenchError::DecompressionFailed { .. } => Some(Operation::Decompress),
            _ => None,
        }
    }
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchError::LibraryDirTooLong { len, max } => write!(
                f,
                "library directory name of {} characters does not fit {} characters with trailing slash",
                len, max
            ),
            BenchError::UnsupportedCodec(codec) => write!(
                f,
                "{} has no reference library; supported compression methods are: {}",
                codec,
                super::codecs::supported_names()
            ),
            BenchError::InvalidIterations(n) => write!(f, "invalid iteration count {}", n),
            BenchError::InvalidMemLimit(n) => write!(f, "invalid memory limit {} bytes", n),
            BenchError::Load { library, reason } => {
                write!(f, "error in opening dynamic library [{}]:[{}]", library, reason)
            }
            BenchError::Symbol { library, symbol, reason } => write!(
                f,
                "error in loading symbol [{}] from dynamic library [{}]: [{}]",
                symbol, library, reason
            ),
            BenchError::CompressionFailed { codec, level, cause } => {
                write!(f, "{}-{} compression failed: {}", codec, level, cause)
            }
            BenchError::DecompressionFailed { codec, level, cause } => {
                write!(f, "{}-{} decompression failed: {}", codec, level, cause)
            }
            BenchError::VerificationFailed { codec, level, file_name, mismatch } => write!(
                f,
                "{}-{} [Filename:{}] verification failed: {}",
                codec, level, file_name, mismatch
            ),
            BenchError::Io(e) => write!(f, "input I/O error: {}", e),
        }
    }
}

impl std::error::Error for BenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BenchError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for BenchError {
    fn from(e: io::Error) -> Self {
        BenchError::Io(e)
    }
}
