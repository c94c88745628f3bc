use std::fmt::Display;
use std::path::PathBuf;

use crate::constants::ERROR_STYLE;
use crate::constants::HELP_STYLE;

/// The kinds of failure `crab` reports to its caller.
///
/// These are always carried inside an [anyhow::Error], usually with a
/// [Ctx] attached, and can be recovered with `downcast_ref::<CrabError>()`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CrabError {
    /// The command line, the configuration or a name derived from them is
    /// not usable.
    #[error("{0}")]
    Configuration(String),

    /// A required option was not given.
    #[error("the option {0} is required")]
    MissingOption(&'static str),

    /// The working directory of a task does not exist.
    #[error("Working directory for task {0} not found")]
    TaskNotFound(String),

    /// The working directory exists but holds no cache file.
    #[error("Cannot find .requestcache file inside the working directory for task {0}")]
    CacheNotFound(String),

    /// The cache file could not be understood.
    #[error("The cache file {0:?} could not be decoded")]
    CacheDecode(PathBuf),

    /// A new work area would overwrite an existing one.
    #[error("Working area {0:?} already exists")]
    DuplicateWorkArea(PathBuf),

    /// Talking to the server failed.
    #[error("{0}")]
    Communication(String),
}

/// The error context structure, provides an explanation and help.
///
/// The first element of the structre is the errors "context".
/// The second element is the help message displayed to the user.
///
/// Both have to implement [Display], and will be displayed when the error is
/// printed.
///
/// # Example
///
/// You can use this for example with two [String]s.
///
/// ```should_panic
/// # use crab_lib::error::Ctx;
/// # use anyhow::anyhow;
/// # use anyhow::Result;
/// # use anyhow::Context;
/// # fn main() -> Result<()> {
/// Err(anyhow!("Any struct implementing std::error::Error")).context(Ctx("context", "help"))
/// # }
/// ```
#[derive(Debug)]
pub struct Ctx<A, B>(pub A, pub B)
where
    A: Display,
    B: Display;

impl<A: Display, B: Display> Display for Ctx<A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !format!("{}", self.0).is_empty() {
            writeln!(f, "{}caused by:{:#} {}", ERROR_STYLE, ERROR_STYLE, self.0)?;
        }

        if !format!("{}", self.1).is_empty() {
            writeln!(f, "\n{}help:{:#} {}", HELP_STYLE, HELP_STYLE, self.1)?;
        }

        Ok(())
    }
}

/// This is a shorthand for returning the context of a error.
///
/// This macro takes a context message, a help message and formats them.
///
/// A macro invocation like so:
/// ```ignore
/// ctx!([context], [context arg 1], [context arg 2], ...; [help], [help args], ...)
/// ```
/// Will desugar to:
/// ```ignore
/// || Ctx(format!([context], [context args]), format!([help], [help args]))
/// ```
///
/// Note the placement of the `;` and `,`. They are required and otherwise the
/// macro will not parse.
///
/// # Example
///
/// ```no_run
/// # #[macro_use]
/// # use crab_lib::error::Ctx;
/// # use crab_lib::ctx;
/// # use std::path::PathBuf;
/// # use anyhow::Context;
/// # let path: PathBuf = "/".parse().unwrap();
/// std::fs::read(&path).with_context(ctx!(
///   "Could not read the file {path:?}", ;
///   "Ensure that the file exists and you have permissions to access it",
/// ));
/// ```
#[macro_export]
macro_rules! ctx {
    {$cause: expr,  $($arg_cause: expr)*; $help: expr, $($arg_help: tt)*} => {
      || $crate::error::Ctx(format!($cause, $($arg_cause)*), format!($help, $($arg_help)*))
    };
}

pub use ctx;

/// Find the [CrabError] carried by an error, if there is one.
pub fn kind(err: &anyhow::Error) -> Option<&CrabError> {
    err.downcast_ref::<CrabError>()
}
