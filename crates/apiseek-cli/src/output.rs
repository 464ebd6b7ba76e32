//! Terminal output
//!
//! Colored, human-readable rendering of candidates, lookups and index
//! statistics, plus a JSON mode for scripting.

use std::sync::Arc;

use apiseek_core::{Candidate, IndexStats, NodeKind, OperationDescriptor};
use colored::Colorize;
use serde::Serialize;

use crate::loader::LoadSummary;

/// Columns available to a summary line
const SUMMARY_WIDTH: usize = 72;

/// Machine-readable result of one search
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport<'a> {
    pub query: &'a str,
    pub candidates: &'a [Candidate],
    /// Top candidate when it can be accepted without asking
    pub accepted: Option<&'a Candidate>,
}

/// Print any serializable value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print operations as a JSON array
pub fn print_operations_json(operations: &[Arc<OperationDescriptor>]) -> anyhow::Result<()> {
    let plain: Vec<&OperationDescriptor> = operations.iter().map(Arc::as_ref).collect();
    print_json(&plain)
}

/// One-line description of where a candidate matched
pub fn match_label(candidate: &Candidate) -> String {
    match (&candidate.source_type, &candidate.matched_property_path) {
        (NodeKind::Property, Some(path)) => format!("property {}", path),
        (kind, _) => kind.to_string(),
    }
}

pub fn print_report(report: &SearchReport<'_>) {
    if report.candidates.is_empty() {
        println!("{}", "No matching operation found.".yellow());
        return;
    }

    for (rank, candidate) in report.candidates.iter().enumerate() {
        let accepted = report
            .accepted
            .is_some_and(|top| std::ptr::eq(top, candidate));
        let marker = if accepted { "*".green().bold() } else { " ".normal() };

        println!(
            "{}{:>2}. {:7} {}  {}",
            marker,
            rank + 1,
            candidate.method.cyan().bold(),
            candidate.path.white().bold(),
            format!("{:.3}", candidate.score).dimmed()
        );
        if let Some(summary) = &candidate.summary {
            println!("      {}", one_line(summary, SUMMARY_WIDTH));
        }
        println!(
            "      {} {}",
            candidate.spec_name.dimmed(),
            match_label(candidate).dimmed()
        );
    }
}

pub fn print_operations(operations: &[Arc<OperationDescriptor>]) {
    if operations.is_empty() {
        println!("{}", "No operation with that method and path.".yellow());
        return;
    }
    for operation in operations {
        println!(
            "{:7} {}  {}",
            operation.method.cyan().bold(),
            operation.path.white().bold(),
            operation.spec_name.dimmed()
        );
        if let Some(summary) = operation.summary() {
            println!("        {}", one_line(summary, SUMMARY_WIDTH));
        }
    }
}

pub fn print_stats(stats: &IndexStats, summary: &LoadSummary) {
    println!("{}", "=== apiseek Index ===".cyan().bold());
    println!();
    println!("{}: {}", "Documents".white().bold(), summary.loaded.len());
    println!("{}: {}", "Skipped Files".white().bold(), summary.skipped.len());
    println!("{}: {}", "Operations".white().bold(), stats.operations);
    println!("{}: {}", "Properties".white().bold(), stats.properties);
    println!("{}: {}", "Indexed Nodes".white().bold(), stats.nodes);
    println!("{}: {}", "Vocabulary".white().bold(), stats.vocabulary);
    println!("{}: {:.2}", "Average Length".white().bold(), stats.avg_length);
    println!(
        "{}: {}",
        "Built At".white().bold(),
        stats.built_at.format("%Y-%m-%d %H:%M:%S")
    );

    if !summary.skipped.is_empty() {
        println!();
        println!("{}", "=== Skipped ===".yellow().bold());
        for reason in &summary.skipped {
            println!("  {}", reason.dimmed());
        }
    }
}

pub fn print_load_summary(summary: &LoadSummary) {
    println!(
        "{} {} documents, {} operations{}",
        "Loaded".green().bold(),
        summary.loaded.len(),
        summary.operations,
        if summary.skipped.is_empty() {
            String::new()
        } else {
            format!(" ({} skipped)", summary.skipped.len())
        }
    );
}

/// Collapse whitespace and cut to `width` characters
fn one_line(text: &str, width: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(width) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}
