// cli/help.rs — codec listing (`-l`) and usage-error helpers.

use std::io::{self, Write};

use crate::bench::codecs::{supported_names, CodecId};
use crate::cli::constants::LEVEL_ERR;
use crate::displaylevel;

/// Writes the descriptor table with level ranges; codecs with a single
/// fixed level show "NA".
pub fn write_codec_list<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Supported compression/decompression methods along with their supported levels are:")?;
    writeln!(out)?;
    writeln!(out, "===========================================")?;
    writeln!(out, "Method Name\tLower Level\tUpper Level")?;
    writeln!(out, "===========================================")?;
    for codec in CodecId::ALL {
        let d = codec.descriptor();
        if d.has_levels() {
            writeln!(out, "{}\t\t {}\t\t{}", d.name, d.level_low, d.level_high)?;
        } else {
            writeln!(out, "{}\t\t {}\t\t{}", d.name, "NA", "NA")?;
        }
    }
    writeln!(out)?;
    writeln!(out, "Methods with a reference library: {}", supported_names())?;
    writeln!(out)
}

/// Prints the codec list to stdout.
pub fn print_codec_list() -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_codec_list(&mut out)?;
    out.flush()
}

/// Prints `msg` to stderr unless the display level is silent.
pub fn print_error(program: &str, msg: &str) {
    displaylevel!(LEVEL_ERR, "{}: {}\n", program, msg);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
