//! Codec descriptor table.
//!
//! One [`CodecDescriptor`] per [`CodecId`], in the fixed table order the
//! all-codecs sweep follows. The table is process-wide constant data; nothing
//! here touches a native library.
//!
//! | Codec  | Levels | Reference library |
//! |--------|--------|-------------------|
//! | LZ4    | 0..=0  | `liblz4.so`       |
//! | LZ4HC  | 1..=12 | `liblz4.so`       |
//! | LZMA   | 0..=9  | none              |
//! | BZIP2  | 1..=9  | `libbz2.so`       |
//! | SNAPPY | 0..=0  | none              |
//! | ZLIB   | 1..=9  | `libz.so`         |
//! | ZSTD   | 1..=22 | none              |

use std::fmt;
use std::ops::RangeInclusive;

/// Codec identifier. Discriminants are table indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CodecId {
    Lz4 = 0,
    Lz4Hc = 1,
    Lzma = 2,
    Bzip2 = 3,
    Snappy = 4,
    Zlib = 5,
    Zstd = 6,
}

/// Number of codec identifiers in the table.
pub const CODEC_COUNT: usize = 7;

/// Immutable per-codec parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecDescriptor {
    pub name: &'static str,
    pub level_low: i32,
    pub level_high: i32,
    /// Codec-specific tunable (BZIP2: native `workFactor`).
    pub extra_param: i32,
    pub max_block_size_param: i32,
}

impl CodecDescriptor {
    /// Inclusive level range.
    pub fn levels(&self) -> RangeInclusive<i32> {
        self.level_low..=self.level_high
    }

    /// `true` when the codec has a single fixed level (displayed as "NA").
    pub fn has_levels(&self) -> bool {
        self.level_low != self.level_high
    }
}

const fn desc(name: &'static str, level_low: i32, level_high: i32) -> CodecDescriptor {
    CodecDescriptor {
        name,
        level_low,
        level_high,
        extra_param: 0,
        max_block_size_param: 0,
    }
}

/// The descriptor table, indexed by `CodecId as usize`.
pub static CODEC_LIST: [CodecDescriptor; CODEC_COUNT] = [
    desc("LZ4", 0, 0),
    desc("LZ4HC", 1, 12),
    desc("LZMA", 0, 9),
    desc("BZIP2", 1, 9),
    desc("SNAPPY", 0, 0),
    desc("ZLIB", 1, 9),
    desc("ZSTD", 1, 22),
];

impl CodecId {
    /// Every identifier, in table order.
    pub const ALL: [CodecId; CODEC_COUNT] = [
        CodecId::Lz4,
        CodecId::Lz4Hc,
        CodecId::Lzma,
        CodecId::Bzip2,
        CodecId::Snappy,
        CodecId::Zlib,
        CodecId::Zstd,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn descriptor(self) -> &'static CodecDescriptor {
        &CODEC_LIST[self.index()]
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Case-insensitive lookup by descriptor name.
    pub fn from_name(name: &str) -> Option<CodecId> {
        CodecId::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }

    /// Shared-library file serving this codec, or `None` for codecs without
    /// a reference-library counterpart.
    pub fn library_file(self) -> Option<&'static str> {
        match self {
            CodecId::Lz4 | CodecId::Lz4Hc => Some("liblz4.so"),
            CodecId::Zlib => Some("libz.so"),
            CodecId::Bzip2 => Some("libbz2.so"),
            CodecId::Lzma | CodecId::Snappy | CodecId::Zstd => None,
        }
    }

    /// `true` when the comparison harness can benchmark this codec.
    #[inline]
    pub fn is_reference_supported(self) -> bool {
        self.library_file().is_some()
    }

    /// Codecs the all-codecs sweep visits, in table order.
    pub fn reference_supported() -> impl Iterator<Item = CodecId> {
        CodecId::ALL.into_iter().filter(|c| c.is_reference_supported())
    }
}

impl fmt::Display for CodecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comma-separated names of the reference-supported codecs.
pub fn supported_names() -> String {
    CodecId::reference_supported()
        .map(CodecId::name)
        .collect::<Vec<_>>()
        .join(", ")
}
