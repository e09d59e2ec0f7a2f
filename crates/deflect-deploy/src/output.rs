// crates/deflect-deploy/src/output.rs
//
// Output formatting for the deflect driver.
// Reports and step logs render as tables for people or JSON for scripts.

use serde::Serialize;
use tabled::{Table, Tabled};

use deflect_core::error::DeflectError;

use crate::report::Report;
use crate::simulate::StepOutcome;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed tables (default).
    Table,
    /// JSON for machine consumption.
    Json,
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> Result<String, DeflectError> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Render a pool and account report.
pub fn render_report(report: &Report, format: OutputFormat) -> Result<String, DeflectError> {
    match format {
        OutputFormat::Json => format_json(report),
        OutputFormat::Table => {
            let mut out = format!(
                "Time {} | staked {} | boost {}\n\nPools\n{}\n",
                report.now,
                report.total_supply,
                report.boosted_total_supply,
                format_table(&report.pools)
            );
            if report.accounts.is_empty() {
                out.push_str("\nNo stakers.\n");
            } else {
                out.push_str(&format!("\nStakers\n{}\n", format_table(&report.accounts)));
            }
            Ok(out)
        }
    }
}

/// Render the outcome of each scripted step.
pub fn render_steps(outcomes: &[StepOutcome], format: OutputFormat) -> Result<String, DeflectError> {
    match format {
        OutputFormat::Json => format_json(&outcomes),
        OutputFormat::Table => Ok(format!("Steps\n{}\n", format_table(outcomes))),
    }
}
