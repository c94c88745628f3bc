use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use regex_lite::Regex;

use crate::constants::TASK_NAME_PATTERN;
use crate::ctx;

/// A complete task name, `<YYMMDD>_<HHMMSS>_<group>:<owner>_crab_<name>`,
/// split into the parts the client addresses it by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskName {
    /// The name exactly as given.
    pub raw: String,

    /// The user who owns the task.
    pub owner: String,

    /// The work area of the task, relative to the directory the client
    /// runs in.
    pub work_area: PathBuf,
}

/// The outcome of filtering a list of task names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Names that have the structure of a complete task name.
    pub accepted: Vec<TaskName>,

    /// Names that do not, as they were given.
    pub rejected: Vec<String>,
}

/// Validates and decomposes complete task names.
#[derive(Debug, Clone)]
pub struct TaskNameFilter {
    /// The compiled [TASK_NAME_PATTERN].
    pattern: Regex,
}

impl TaskNameFilter {
    /// Compile the task name pattern.
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(TASK_NAME_PATTERN).with_context(ctx!(
              "The task name pattern {TASK_NAME_PATTERN} is invalid", ;
              "",
            ))?,
        })
    }

    /// Check whether `raw` is a complete task name.
    pub fn matches(&self, raw: &str) -> bool {
        self.pattern.is_match(raw)
    }

    /// Decompose `raw`, or [None] if it is not a complete task name.
    ///
    /// The owner is the part after the colon of the third `_` separated
    /// token. The work area is whatever follows `<owner>_`.
    pub fn parse(&self, raw: &str) -> Option<TaskName> {
        if !self.matches(raw) {
            return None;
        }

        let owner = raw.split('_').nth(2)?.rsplit(':').next()?;
        let (_, work_area) = raw.split_once(&format!("{owner}_"))?;

        Some(TaskName {
            raw: raw.to_string(),
            owner: owner.to_string(),
            work_area: PathBuf::from(work_area),
        })
    }

    /// Split a comma separated list of task names into the ones that can be
    /// used and the ones that cannot, keeping the input order.
    ///
    /// All whitespace is removed before splitting.
    pub fn partition(&self, list: &str) -> Partition {
        let joined: String = list.split_whitespace().collect();

        let mut partition = Partition::default();

        for item in joined.split(',') {
            match self.parse(item) {
                Some(task) => partition.accepted.push(task),
                None => partition.rejected.push(item.to_string()),
            }
        }

        partition
    }
}

#[cfg(test)]
#[path = "tests/task_name.rs"]
mod tests;
