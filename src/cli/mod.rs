//! CLI module
//!
//! Provides command-line access to:
//! - lifecycle: apply events to a claim tree
//! - elect: apply one election to the current version of an instrument
//! - hash: content address of a claim tree
//! - normalize: normalized form of a claim tree

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    elect_files, hash_file, lifecycle_files, normalize_file, run, run_command, DateClaim,
    DateFixings, HashOutput,
};
pub use errors::{CliError, CliResult};
pub use io::{read_json, write_response};
