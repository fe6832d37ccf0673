//! Output formatting for CLI

use crate::catalog::RuleCatalog;
use crate::validation::{Severity, ValidationReport};

/// Report rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Format a validation report as text
pub fn format_text_report(report: &ValidationReport) -> String {
    let mut output = String::new();

    if !report.issues.is_empty() {
        output.push_str(&format!("Found {} issue(s):\n", report.issues.len()));
    }
    for issue in &report.issues {
        let marker = match issue.severity {
            Severity::Error => "❌",
            Severity::Warning => "⚠️ ",
        };
        output.push_str(&format!(
            "{} {:<7} {:<30} {}",
            marker,
            issue.severity.to_string(),
            issue.code.as_str(),
            issue.source_id
        ));
        if let Some(predicate) = &issue.predicate {
            output.push_str(&format!(" [{}]", predicate));
        }
        output.push_str(&format!("\n     {}\n", issue.message));
    }

    let summary = &report.summary;
    output.push_str(&format!(
        "\nChecked {} entities, {} references ({} resolved edges)\n",
        summary.entities, summary.references, summary.resolved_edges
    ));
    if !summary.by_code.is_empty() {
        let counts: Vec<String> = summary
            .by_code
            .iter()
            .map(|(code, count)| format!("{}={}", code, count))
            .collect();
        output.push_str(&format!("  By code: {}\n", counts.join(", ")));
    }

    if report.valid {
        output.push_str(&format!(
            "\n✅ Model is valid ({} warning(s))\n",
            summary.warnings
        ));
    } else {
        output.push_str(&format!(
            "\n❌ Model is invalid: {} error(s), {} warning(s)\n",
            summary.errors, summary.warnings
        ));
    }

    output
}

/// Format the rules of a catalog, optionally for one source type
pub fn format_rules(catalog: &RuleCatalog, source_type: Option<&str>) -> String {
    let mut output = String::new();
    let mut count = 0;

    for rule in catalog
        .rules()
        .filter(|r| source_type.is_none_or(|t| r.source_type == t))
    {
        count += 1;
        output.push_str(&format!(
            "{}.{} {} -> {}.{} ({}, {:?}, {:?}{}{})\n",
            rule.source_layer,
            rule.source_type,
            rule.predicate,
            rule.target_layer,
            rule.target_type,
            rule.cardinality,
            rule.direction,
            rule.kind,
            if rule.required { ", required" } else { "" },
            if rule.native { ", native" } else { "" },
        ));
    }

    output.push_str(&format!("\n{} rule(s)\n", count));
    output
}
