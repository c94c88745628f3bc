use anstyle::AnsiColor;
use clap::crate_name;
use clap::crate_version;
use crab_lib::constants::style_from_fg;
use crab_lib::constants::ERROR_STYLE;
use crab_lib::constants::HELP_STYLE;
use crab_lib::constants::PRIMARY_STYLE;
use crab_lib::constants::WARNING_STYLE;

use crate::remake::RemakeReport;
use crate::remake::RemakeStatus;

/// Util function for getting the style for the CLI
#[cfg(not(tarpaulin_include))]
pub fn get_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .usage(style_from_fg(AnsiColor::Yellow).bold())
        .header(style_from_fg(AnsiColor::Green).bold().underline())
        .literal(style_from_fg(AnsiColor::Cyan).bold())
        .invalid(style_from_fg(AnsiColor::Blue).bold())
        .error(ERROR_STYLE)
        .valid(HELP_STYLE)
        .placeholder(style_from_fg(AnsiColor::White))
}

/// Pretty print crab's version
#[cfg(not(tarpaulin_include))]
pub fn print_version(script: bool) {
    if script {
        println!("{} {}", crate_name!(), crate_version!());
    } else {
        println!(
            "{PRIMARY_STYLE}{}{PRIMARY_STYLE:#} at version {PRIMARY_STYLE}{}{PRIMARY_STYLE:#}",
            crate_name!(),
            crate_version!()
        );
    }
}

/// Util function: formatting a table for printing
///
/// input: Vec of rows, each row is a Vec of strings (columns)
///
/// output: String
pub fn format_table(data: Vec<Vec<String>>) -> String {
    let columns = data.iter().map(Vec::len).max().unwrap_or(0);

    let mut widths = vec![0; columns];
    for row in &data {
        for (i, item) in row.iter().enumerate() {
            widths[i] = widths[i].max(item.len());
        }
    }

    data.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(i, item)| format!("{item:width$}", width = widths[i]))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The human readable summary of a remake batch.
pub fn format_report(report: &RemakeReport, script: bool) -> String {
    let style = match report.status {
        RemakeStatus::Success => PRIMARY_STYLE,
        RemakeStatus::PartialSuccess => WARNING_STYLE,
        RemakeStatus::Failed => ERROR_STYLE,
    };

    let mut out = if script {
        format!("Status: {}", report.status)
    } else {
        format!("Status: {style}{}{style:#}", report.status)
    };

    let remade: Vec<Vec<String>> = report
        .result
        .remade
        .iter()
        .flat_map(|entry| entry.iter())
        .map(|(task, record)| {
            vec![
                task.clone(),
                record.server.clone(),
                record.instance.clone(),
            ]
        })
        .collect();

    if !remade.is_empty() {
        out.push_str("\nRemade:\n");
        out.push_str(&format_table(remade));
    }

    if !report.result.rejected.is_empty() {
        out.push_str("\nRejected:\n");
        out.push_str(&report.result.rejected.join("\n"));
    }

    out
}

#[cfg(test)]
#[path = "tests/printing.rs"]
mod tests;
