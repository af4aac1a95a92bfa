// cli/args.rs — command-line model and conversion into a BenchConfig.
//
// Options follow the reference bench tool: single-letter flags whose values
// may be attached (`-i5`, `-ezlib:6`, `-m64`) or separate (`-i 5`). The
// verbosity level is the exception: it is only ever attached (`-v3`).

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use clap::Parser;

use crate::bench::{BenchConfig, CodecId};
use crate::cli::constants::{clamp_verbosity, DEFAULT_REPORT_LABEL, PROGRAM_NAME};
use crate::config::{BENCH_NUM_ITERS, MB, UNINIT_LEVEL, UNINIT_OPT_VAR};

/// A `-e` argument: `name[:level[:extra]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSpec {
    pub codec: CodecId,
    /// [`UNINIT_LEVEL`] when absent.
    pub level: i32,
    /// [`UNINIT_OPT_VAR`] when absent.
    pub extra: i32,
}

/// Parses `name[:level[:extra]]`; the name is matched case-insensitively.
pub fn parse_method(spec: &str) -> anyhow::Result<MethodSpec> {
    let mut fields = spec.split(':');
    let name = fields.next().unwrap_or_default();
    let codec = CodecId::from_name(name)
        .ok_or_else(|| anyhow!("unknown compression method '{}'; use -l to list methods", name))?;

    let level = match fields.next() {
        Some(l) => l
            .trim()
            .parse::<i32>()
            .with_context(|| format!("invalid level '{}' for {}", l, codec))?,
        None => UNINIT_LEVEL,
    };
    let extra = match fields.next() {
        Some(x) => x
            .trim()
            .parse::<i32>()
            .with_context(|| format!("invalid additional parameter '{}' for {}", x, codec))?,
        None => UNINIT_OPT_VAR,
    };
    if fields.next().is_some() {
        bail!("too many ':' fields in '{}'; expected name[:level[:extra]]", spec);
    }
    Ok(MethodSpec { codec, level, extra })
}

fn parse_method_arg(spec: &str) -> Result<MethodSpec, String> {
    parse_method(spec).map_err(|e| format!("{:#}", e))
}

#[derive(Debug, Parser)]
#[command(
    name = PROGRAM_NAME,
    version,
    about = "Benchmark native LZ4, LZ4HC, ZLIB and BZIP2 shared libraries",
    after_help = "Reference libraries (liblz4.so, libz.so, libbz2.so) are loaded from --libdir, \
                  or from the default library search path when it is not given."
)]
pub struct Cli {
    /// Use all the available compression/decompression methods
    #[arg(short = 'a', conflicts_with = "method")]
    pub all: bool,

    /// Compression/decompression method, with optional level and additional parameter
    #[arg(short = 'e', value_name = "NAME[:LEVEL[:EXTRA]]", value_parser = parse_method_arg)]
    pub method: Option<MethodSpec>,

    /// Number of iterations of compression/decompression
    #[arg(short = 'i', value_name = "N", default_value_t = BENCH_NUM_ITERS)]
    pub iterations: u32,

    /// Maximum size in MBs of the input held in memory [default: MIN(filesize, 1024 MB)]
    #[arg(short = 'm', value_name = "MB")]
    pub mem_limit_mb: Option<usize>,

    /// Verify every decompressed chunk against its source
    #[arg(short = 't')]
    pub verify: bool,

    /// Print stats like compression/decompression time, speed, ratio
    #[arg(short = 'p')]
    pub print_stats: bool,

    /// Verbosity: 1 Error (default), 2 Info, 3 Debug, 4 Trace; attached, as in -v3
    #[arg(short = 'v', value_name = "LEVEL")]
    pub verbosity: Option<u32>,

    /// List all the available compression/decompression methods
    #[arg(short = 'l')]
    pub list: bool,

    /// Directory holding the reference shared libraries
    #[arg(long = "libdir", value_name = "DIR", default_value = "")]
    pub libdir: String,

    /// Tag printed at the start of every report line
    #[arg(long = "label", value_name = "TEXT", default_value = DEFAULT_REPORT_LABEL)]
    pub label: String,

    /// Input file
    #[arg(value_name = "INPUT", required_unless_present = "list")]
    pub input: Option<PathBuf>,
}

/// Rewrites a bare `-v` into `-v1` so the word after it stays positional.
/// Arguments after `--` are left alone.
pub fn attach_verbosity<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut operands = false;
    args.into_iter()
        .map(|arg| {
            let arg = arg.into();
            if operands {
                return arg;
            }
            if arg == "--" {
                operands = true;
            } else if arg == "-v" {
                return OsString::from("-v1");
            }
            arg
        })
        .collect()
}

impl Cli {
    /// Parses the process arguments, exiting on usage errors.
    pub fn from_env() -> Self {
        Cli::parse_from(attach_verbosity(std::env::args_os()))
    }

    /// Parses `args` (program name first).
    pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Cli::try_parse_from(attach_verbosity(args))
    }

    /// Display level selected by `-v`, clamped to the supported range.
    pub fn display_level(&self) -> Option<u32> {
        self.verbosity.map(clamp_verbosity)
    }

    /// Builds the run configuration. Range checks that need the codec table
    /// or the file system are left to [`BenchConfig::validate`].
    pub fn to_config(&self) -> anyhow::Result<BenchConfig> {
        let mut config = BenchConfig::default();
        match self.method {
            Some(m) => {
                config.set_codec(m.codec).set_level(m.level).set_extra(m.extra);
            }
            None => {
                config.set_all_codecs();
            }
        }
        if let Some(mb) = self.mem_limit_mb {
            let bytes = mb
                .checked_mul(MB)
                .ok_or_else(|| anyhow!("memory limit of {} MB is too large", mb))?;
            config.set_mem_limit(bytes);
        }
        config
            .set_iterations(self.iterations)
            .set_verify(self.verify)
            .set_print_stats(self.print_stats)
            .set_library_dir(&self.libdir)
            .set_label(&self.label);
        Ok(config)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
