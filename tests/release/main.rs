//! Runs the `yankee` binary against fixture projects.
//!
//! Each case directory has an `in` directory which is copied into a fresh Git repo, an `out`
//! directory with the files expected afterward, and `stdout.log` or `stderr.log` with the expected
//! output. A `dryrun_stdout.log` means the case is also run with `--dry-run` first.

mod config;
mod dry_run;
mod errors;
mod git;
mod helpers;
mod npm;
