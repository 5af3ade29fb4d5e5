//! Restore display formatting
//!
//! Formats restore and inspection reports for terminal output.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::restore::{InspectReport, RestoreReport, SectionOutcome, SectionReport};
use crate::snapshot::SectionName;

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Section")]
    section: String,
    #[tabled(rename = "Outcome")]
    outcome: &'static str,
    #[tabled(rename = "Details")]
    details: String,
}

impl From<&SectionReport> for OutcomeRow {
    fn from(report: &SectionReport) -> Self {
        let details = match &report.outcome {
            SectionOutcome::Applied { changes: Some(changes) } => changes.clone(),
            SectionOutcome::Applied { changes: None } => "no changes".to_string(),
            SectionOutcome::Skipped => "not in file".to_string(),
            SectionOutcome::Failed { cause } => cause.clone(),
        };

        Self {
            section: report.label().to_string(),
            outcome: report.outcome.as_str(),
            details,
        }
    }
}

/// Format a finished restore: summary line, section table and warnings
pub fn format_restore_report(report: &RestoreReport) -> String {
    let mut output = String::new();
    output.push_str(&report.summary());
    output.push('\n');

    if !report.sections.is_empty() {
        let rows: Vec<OutcomeRow> = report.sections.iter().map(OutcomeRow::from).collect();
        output.push('\n');
        output.push_str(&Table::new(rows).with(Style::psql()).to_string());
        output.push('\n');
    }

    push_warnings(&mut output, report.warnings.iter().map(|w| w.to_string()));
    output
}

#[derive(Tabled)]
struct InspectRow {
    #[tabled(rename = "Section")]
    section: String,
    #[tabled(rename = "In file")]
    present: &'static str,
    #[tabled(rename = "On restore")]
    action: &'static str,
}

/// Format what a restore of the inspected file would do
pub fn format_inspect_report(report: &InspectReport) -> String {
    let mut output = String::new();

    match report.version {
        Some(version) => output.push_str(&format!("Schema version: {}\n", version)),
        None => output.push_str("Schema version: not declared\n"),
    }

    let present = report.present.iter().map(|section| InspectRow {
        section: section_label(section),
        present: "yes",
        action: "restore",
    });
    let missing = report.missing.iter().map(|section| InspectRow {
        section: section_label(section),
        present: "no",
        action: "skip",
    });
    let unknown = report.unknown.iter().map(|section| InspectRow {
        section: section.clone(),
        present: "yes",
        action: "ignore",
    });
    let rows: Vec<InspectRow> = present.chain(missing).chain(unknown).collect();

    output.push('\n');
    output.push_str(&Table::new(rows).with(Style::psql()).to_string());
    output.push('\n');

    push_warnings(&mut output, report.warnings.iter().map(|w| w.to_string()));

    output.push('\n');
    if report.is_empty() {
        output.push_str("Nothing in this file would be restored.\n");
    } else {
        output.push_str(&format!(
            "{} of {} sections would be restored.\n",
            report.present.len(),
            report.present.len() + report.missing.len()
        ));
    }
    output
}

fn section_label(section: &str) -> String {
    section
        .parse::<SectionName>()
        .map(|name| name.label().to_string())
        .unwrap_or_else(|_| section.to_string())
}

fn push_warnings(output: &mut String, warnings: impl Iterator<Item = String>) {
    let warnings: Vec<String> = warnings.collect();
    if warnings.is_empty() {
        return;
    }

    output.push_str("\nWarnings:\n");
    for warning in warnings {
        output.push_str(&format!("  - {}\n", warning));
    }
}
