use std::collections::BTreeSet;

use anyhow::Context;
use anyhow::Result;
use regex_lite::Regex;

use crate::constants::JOB_IDS_PATTERN;
use crate::ctx;
use crate::error::CrabError;

/// Expand a comma separated list of job ids and `first-last` ranges.
///
/// The ids come back sorted and without duplicates. A range whose first id
/// is larger than its last contributes nothing.
pub fn parse_job_ids(list: &str) -> Result<Vec<u64>> {
    let pattern = Regex::new(JOB_IDS_PATTERN).with_context(ctx!(
      "The job id pattern {JOB_IDS_PATTERN} is invalid", ;
      "",
    ))?;

    if !pattern.is_match(list) {
        return Err(invalid(list)).with_context(ctx!(
          "Could not read the job ids {list:?}", ;
          "Give ids such as 1,3-5,8",
        ));
    }

    let mut ids = BTreeSet::new();

    for element in list.split(',') {
        match element.split_once('-') {
            Some((first, last)) => ids.extend(number(first, list)?..=number(last, list)?),
            None => {
                ids.insert(number(element, list)?);
            }
        }
    }

    Ok(ids.into_iter().collect())
}

fn invalid(list: &str) -> CrabError {
    CrabError::Configuration(format!(
        "The job ids {list:?} should be a comma separated list of integers or ranges, \
        no whitespace"
    ))
}

// digits only by now, but they may not fit
fn number(digits: &str, list: &str) -> Result<u64> {
    digits.parse().map_err(|_| invalid(list)).with_context(ctx!(
      "The job id {digits} is too large", ;
      "",
    ))
}

#[cfg(test)]
#[path = "tests/job_ids.rs"]
mod tests;
