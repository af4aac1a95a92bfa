//! Command-line interface for the `codec_bench` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Program identity strings, verbosity levels, the `DISPLAY_LEVEL` atomic and display macros. |
//! | [`args`]      | `clap` model of the options and its conversion into a [`crate::bench::BenchConfig`]. |
//! | [`help`]      | Codec listing (`-l`) and error printing. |
//!
//! Typical call sequence: `Cli::from_env` → `Cli::to_config` → [`crate::bench::bench_file`].

pub mod constants;
pub mod help;
pub mod args;
