//! `crab` creates and remakes the local work areas of CRAB tasks and talks
//! to the server about them.

use std::process::ExitCode;

/// The command line interface and relevant structures.
#[cfg(not(tarpaulin_include))]
pub mod cli;

/// Recreating the work areas of tasks that exist on the server.
pub mod remake;

/// Creating the work area of a new task.
pub mod create;

/// Communication with the CRAB server.
pub mod rest;

/// Sending log files to the server for the operators.
pub mod upload;


/// The main CLI entry-point of the `crab` utility.
///
/// This function parses command-line arguments and executes
/// sub-commands as specified by the user.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    cli::process::parse_command()
}
