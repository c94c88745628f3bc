use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use chrono::Local;
use log::Level;

use crate::constants::LOG_FILE;

/// The log of the task currently being worked on.
///
/// Every message goes to the console through [log], and once the sink has
/// been pointed at a work area it is also appended to that area's
/// `crab.log`, at every level and without colours.
#[derive(Debug, Clone, Default)]
pub struct TaskLog {
    /// The `crab.log` messages are appended to, if any.
    file: Option<PathBuf>,
}

impl TaskLog {
    /// A sink that only writes to the console.
    pub fn new() -> Self {
        Self::default()
    }

    /// Send all further messages to the `crab.log` in `folder`.
    ///
    /// Returns the path of the log file.
    pub fn redirect(&mut self, folder: &Path) -> PathBuf {
        let path = folder.join(LOG_FILE);
        log::debug!("Logging to {path:?}");
        self.file = Some(path.clone());
        path
    }

    /// The file messages are currently appended to.
    pub fn path(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Log at error level.
    pub fn error(&self, msg: impl Display) {
        self.record(Level::Error, msg);
    }

    /// Log at warning level.
    pub fn warn(&self, msg: impl Display) {
        self.record(Level::Warn, msg);
    }

    /// Log at info level.
    pub fn info(&self, msg: impl Display) {
        self.record(Level::Info, msg);
    }

    /// Log at debug level.
    pub fn debug(&self, msg: impl Display) {
        self.record(Level::Debug, msg);
    }

    fn record(&self, level: Level, msg: impl Display) {
        let msg = msg.to_string();
        log::log!(level, "{msg}");

        let Some(path) = &self.file else {
            return;
        };

        let line = format!(
            "{} {}: \t {}\n",
            level,
            Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            strip_styles(&msg)
        );

        // the log file is best effort, the console already has the message
        let appended = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(line.as_bytes()));

        if let Err(e) = appended {
            log::trace!("Could not append to {path:?}: {e}");
        }
    }
}

/// Remove ANSI escape sequences from `text`.
pub fn strip_styles(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }

        // skip `[`, parameters and the final byte
        for c in chars.by_ref() {
            if c.is_ascii_alphabetic() {
                break;
            }
        }
    }

    out
}

#[cfg(test)]
#[path = "tests/logging.rs"]
mod tests;
