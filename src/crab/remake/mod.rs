use std::collections::BTreeMap;
use std::fmt::Display;

use anyhow::Context;
use anyhow::Result;
use crab_lib::cache::CacheRecord;
use crab_lib::constants::WARNING_STYLE;
use crab_lib::ctx;
use crab_lib::error::CrabError;
use crab_lib::file_system::FileOperations;
use crab_lib::logging::TaskLog;
use crab_lib::task_name::TaskNameFilter;
use crab_lib::work_area::ServerTarget;
use crab_lib::work_area::WorkAreaManager;
use serde::Serialize;

/// How a remake batch went as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RemakeStatus {
    /// Every task was remade.
    #[serde(rename = "SUCCESS")]
    Success,

    /// Some tasks were remade, others were rejected.
    #[serde(rename = "PARTIAL SUCCESS")]
    PartialSuccess,

    /// Nothing was remade.
    #[serde(rename = "FAILED")]
    Failed,
}

impl Display for RemakeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemakeStatus::Success => write!(f, "SUCCESS"),
            RemakeStatus::PartialSuccess => write!(f, "PARTIAL SUCCESS"),
            RemakeStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// The tasks a remake batch touched.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RemakeResult {
    /// One `{task name: cache record}` entry per remade task.
    pub remade: Vec<BTreeMap<String, CacheRecord>>,

    /// The tasks that were not remade, as they were given.
    pub rejected: Vec<String>,
}

/// The outcome of a remake batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemakeReport {
    /// The overall status.
    pub status: RemakeStatus,

    /// What happened to the individual tasks.
    pub result: RemakeResult,
}

/// The overall status of a batch.
///
/// `accepted` is the number of well-formed task names, `rejected` and
/// `remade` the number of tasks that ended up in either list.
pub fn status(accepted: usize, rejected: usize, remade: usize) -> RemakeStatus {
    if rejected == 0 {
        RemakeStatus::Success
    } else if accepted == 0 || remade == 0 {
        RemakeStatus::Failed
    } else {
        RemakeStatus::PartialSuccess
    }
}

/// Recreate the work areas of every task in the comma separated `cmptask`.
///
/// Malformed names are rejected with a warning, as are tasks whose work
/// area already has a cache. Fails only when the option is missing or no
/// name is well-formed.
pub fn remake_tasks<F: FileOperations>(
    cmptask: Option<&str>,
    manager: &WorkAreaManager<'_, F>,
    target: &ServerTarget,
    log: &TaskLog,
) -> Result<RemakeReport> {
    let Some(list) = cmptask else {
        return Err(CrabError::MissingOption("--cmptask")).with_context(ctx!(
          "Nothing to remake", ;
          "Give the complete task names with --cmptask",
        ));
    };

    let partition = TaskNameFilter::new()?.partition(list);

    for rejected in &partition.rejected {
        log.warn(format!(
            "{WARNING_STYLE}Warning{WARNING_STYLE:#}: {rejected:?} does not match the format \
            of a complete task name and is skipped"
        ));
    }

    if partition.accepted.is_empty() {
        return Err(CrabError::Configuration(
            "No task name matches the expected format <YYMMDD>_<hhmmss>_<schedd>:<user>_crab_<name>"
                .to_string(),
        ))
        .with_context(ctx!(
          "Could not remake {list:?}", ;
          "Copy the complete task names from the monitoring pages",
        ));
    }

    let mut result = RemakeResult {
        remade: Vec::new(),
        rejected: partition.rejected,
    };

    for task in &partition.accepted {
        match manager.remake(task, target, log)? {
            Some(record) => {
                result
                    .remade
                    .push(BTreeMap::from([(task.raw.clone(), record)]));
            }
            None => result.rejected.push(task.raw.clone()),
        }
    }

    Ok(RemakeReport {
        status: status(
            partition.accepted.len(),
            result.rejected.len(),
            result.remade.len(),
        ),
        result,
    })
}
