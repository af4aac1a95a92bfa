//! Binary entry point for the `codec_bench` command-line tool.
//!
//! # Control flow
//!
//! 1. [`Cli::from_env`] reads the options; usage errors exit with clap's status.
//! 2. `-l` prints the codec table and exits.
//! 3. [`run`] converts the options into a [`BenchConfig`] and hands the input
//!    file to [`bench_file`].
//!
//! Exit status: 0 on success, 2 for configuration errors (bad options,
//! unsupported codec, overlong library directory), 1 for runtime errors
//! (library or symbol load, codec failure, verification failure, I/O).

use anyhow::Context;

use codec_bench::bench::{bench_file, BenchError, ErrorClass};
use codec_bench::cli::args::Cli;
use codec_bench::cli::constants::{set_display_level, LEVEL_DEBUG, PROGRAM_NAME, PROGRAM_VERSION};
use codec_bench::cli::help::{print_codec_list, print_error};

const EXIT_RUNTIME: i32 = 1;
const EXIT_CONFIGURATION: i32 = 2;

/// Runs one benchmark invocation; returns the number of cells completed.
fn run(cli: &Cli) -> anyhow::Result<usize> {
    let config = cli.to_config()?;
    let input = cli
        .input
        .as_deref()
        .context("no input file given; use -h for the supported options")?;

    codec_bench::displaylevel!(
        LEVEL_DEBUG,
        "*** {} v{} {}-bit ***\n",
        PROGRAM_NAME,
        PROGRAM_VERSION,
        std::mem::size_of::<*const ()>() * 8
    );

    let cells = bench_file(input, &config)
        .with_context(|| format!("Error in compression and decompression operations on [{}]", input.display()))?;
    Ok(cells)
}

/// Exit status for a failed run.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<BenchError>() {
        Some(e) if e.class() == ErrorClass::Configuration => EXIT_CONFIGURATION,
        Some(_) => EXIT_RUNTIME,
        // option conversion failed before any BenchError could arise
        None => EXIT_CONFIGURATION,
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::from_env();
    if let Some(level) = cli.display_level() {
        set_display_level(level);
    }

    if cli.list {
        if let Err(e) = print_codec_list() {
            print_error(PROGRAM_NAME, &e.to_string());
            std::process::exit(EXIT_RUNTIME);
        }
        std::process::exit(0);
    }

    match run(&cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            print_error(PROGRAM_NAME, &format!("{:#}", e));
            std::process::exit(exit_code(&e));
        }
    }
}
