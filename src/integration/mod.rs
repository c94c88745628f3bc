//! # Integration tests for the command line of `crab`.
//! The tests in this module run the compiled binary in a scratch directory.
//! Nothing here talks to a server, so `server-info` and the upload itself
//! are covered by the unit tests with a canned server instead.
//!
//! ## Test Plan
//!
//! + [x] Test the `crab version` command.
//! + [x] Test the `crab remake` command.
//! + [x] Test the `crab create` command.
//! + [x] Test the `crab upload-log` preconditions.

mod create;
mod remake;
mod upload;
mod version;

use std::path::PathBuf;

use tempdir::TempDir;

/// The testing environment passed to individual #[test](s)
struct TestEnv {
    crab_path: PathBuf,
    temp_dir: TempDir,
}

/// Run `crab` inside the test environment.
#[macro_export]
macro_rules! crab {
    ($env:expr; $($arg:expr),*) => {
        std::process::Command::new(&$env.crab_path)
            .args([$($arg),*])
            .current_dir($env.temp_dir.path())
            .env("RUST_BACKTRACE", "0")
            .env_remove("RUST_LIB_BACKTRACE")
            .env_remove("CRAB_WORKING_AREA")
            .env_remove("X509_USER_PROXY")
            .output()
            .unwrap()
    };
    ($env:expr; $($arg:expr),*; $msg:expr) => {
        {
            let out = $crate::crab!($env; $($arg),*);
            if !out.status.success() {
                panic!("crab {} failed: {}", $msg, String::from_utf8(out.stderr).unwrap());
            }
            out
        }
    };
}

fn init() -> TestEnv {
    let crab_path = PathBuf::from(env!("CARGO_BIN_EXE_crab"));
    assert!(
        crab_path.exists(),
        "\nTest setup couldn't find the crab executable.
    [Expected to find it at: {:?}]\n",
        crab_path
    );

    // CARGO_TARGET_TMPDIR means you can debug by looking in the ./target folder
    let temp_dir = TempDir::new_in(env!("CARGO_TARGET_TMPDIR"), "crab").unwrap();

    TestEnv {
        crab_path,
        temp_dir,
    }
}

fn stdout(out: &std::process::Output) -> String {
    String::from_utf8(out.stdout.clone()).unwrap()
}

fn stderr(out: &std::process::Output) -> String {
    String::from_utf8(out.stderr.clone()).unwrap()
}
