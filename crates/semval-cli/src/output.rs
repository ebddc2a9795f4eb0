//! Reading documents and writing reports

use crate::structural::is_yaml;
use anyhow::Context;
use semval_validation::{Severity, ValidationReport};
use serde_json::Value;
use std::io::Write;
use std::path::Path;

/// Read a JSON or YAML document
pub fn read_document(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    let value = if is_yaml(path) {
        serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse YAML input {}", path.display()))?
    } else {
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON input {}", path.display()))?
    };
    Ok(value)
}

/// Persist the report as pretty-printed JSON
pub fn write_report(path: &Path, report: &ValidationReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write report {}", path.display()))?;
    tracing::info!("Report written to {}", path.display());
    Ok(())
}

/// Human-readable summary of a report
pub fn print_summary(out: &mut impl Write, input: &Path, report: &ValidationReport) -> std::io::Result<()> {
    writeln!(out, "Validated {} as {}", input.display(), report.target_class)?;

    for result in &report.validation_results {
        let status = if result.valid { "passed" } else { "failed" };
        writeln!(out, "{}: {status}", result.plugin_name)?;
        for message in &result.validation_messages {
            writeln!(out, "  {message}")?;
        }
    }

    writeln!(out, "Errors: {}", report.count(Severity::Error))?;
    writeln!(out, "Warnings: {}", report.count(Severity::Warning))?;
    writeln!(out, "Fatal: {}", report.count(Severity::Fatal))?;

    if report.valid {
        writeln!(out, "Validation passed.")
    } else {
        writeln!(out, "Validation failed.")
    }
}
