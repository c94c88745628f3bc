//! The shared core of the `crab` client: everything that touches a task's
//! local work area, independent of the command line.

/// Client configuration, read from `crab.toml`.
pub mod config;

/// Constant values.
pub mod constants;

/// The error handling for `crab`.
pub mod error;

/// Common file operations
pub mod file_system;

/// The `.requestcache` file stored in every work area.
pub mod cache;

/// Parsing of complete task names as shown by the monitoring pages.
pub mod task_name;

/// Lists of job ids given on the command line.
pub mod job_ids;

/// Creating, remaking and loading task work areas.
pub mod work_area;

/// The per-task `crab.log` sink.
pub mod logging;

/// An explicit registry of commands and job types.
pub mod plugins;

/// Helper functions for testing, only compiled in test mode.
#[cfg(test)]
mod test_utils;
