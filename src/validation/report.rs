//! Diagnostics: issues, the sorted report, and its summary

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Issue severity; `Error` sorts above `Warning`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Stable diagnostic codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    DanglingReference,
    TypeMismatch,
    CardinalityViolation,
    DirectionViolation,
    CircularComposition,
    CircularSpecialization,
    NamingConventionWarning,
    MalformedListWarning,
    MalformedReferenceWarning,
    DuplicateTargetWarning,
    LayerPrefixMismatchWarning,
    DuplicateId,
    UnknownPredicate,
    UnknownSource,
    MissingRequiredReference,
    LayerMismatch,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DanglingReference => "DANGLING_REFERENCE",
            Self::TypeMismatch => "TYPE_MISMATCH",
            Self::CardinalityViolation => "CARDINALITY_VIOLATION",
            Self::DirectionViolation => "DIRECTION_VIOLATION",
            Self::CircularComposition => "CIRCULAR_COMPOSITION",
            Self::CircularSpecialization => "CIRCULAR_SPECIALIZATION",
            Self::NamingConventionWarning => "NAMING_CONVENTION_WARNING",
            Self::MalformedListWarning => "MALFORMED_LIST_WARNING",
            Self::MalformedReferenceWarning => "MALFORMED_REFERENCE_WARNING",
            Self::DuplicateTargetWarning => "DUPLICATE_TARGET_WARNING",
            Self::LayerPrefixMismatchWarning => "LAYER_PREFIX_MISMATCH_WARNING",
            Self::DuplicateId => "DUPLICATE_ID",
            Self::UnknownPredicate => "UNKNOWN_PREDICATE",
            Self::UnknownSource => "UNKNOWN_SOURCE",
            Self::MissingRequiredReference => "MISSING_REQUIRED_REFERENCE",
            Self::LayerMismatch => "LAYER_MISMATCH",
        }
    }

    /// Severity an issue with this code is raised with
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::NamingConventionWarning
            | Self::MalformedListWarning
            | Self::MalformedReferenceWarning
            | Self::DuplicateTargetWarning
            | Self::LayerPrefixMismatchWarning => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl std::fmt::Display for IssueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub source_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_ids: Vec<String>,
}

impl ValidationIssue {
    /// Create an issue with the default severity of its code
    pub fn new(code: IssueCode, source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: code.default_severity(),
            code,
            source_id: source_id.into(),
            predicate: None,
            message: message.into(),
            related_ids: Vec::new(),
        }
    }

    pub fn with_predicate(mut self, predicate: impl Into<String>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    pub fn with_related<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.related_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Same issue raised as an error
    fn promoted(&self) -> Self {
        Self {
            severity: Severity::Error,
            ..self.clone()
        }
    }

    fn report_order(&self, other: &Self) -> Ordering {
        self.source_id
            .cmp(&other.source_id)
            .then_with(|| other.severity.cmp(&self.severity))
            .then_with(|| self.code.as_str().cmp(other.code.as_str()))
            .then_with(|| self.predicate.cmp(&other.predicate))
            .then_with(|| self.message.cmp(&other.message))
            .then_with(|| self.related_ids.cmp(&other.related_ids))
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} {}", self.severity, self.code, self.source_id)?;
        if let Some(predicate) = &self.predicate {
            write!(f, " ({})", predicate)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Totals shown alongside the issue list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub errors: usize,
    pub warnings: usize,
    pub by_code: BTreeMap<String, usize>,
    pub entities: usize,
    pub references: usize,
    pub resolved_edges: usize,
}

/// The final, sorted result of a validation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
    pub summary: ReportSummary,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// Issues carrying a given code, in report order
    pub fn with_code(&self, code: IssueCode) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.code == code)
    }

    /// Pretty JSON; identical models give identical output
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Counts the reporter needs besides the issues
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelTotals {
    pub entities: usize,
    pub references: usize,
    pub resolved_edges: usize,
}

/// Turns the issues of all components into a [`ValidationReport`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagnosticsReporter {
    promote_warnings: bool,
}

impl DiagnosticsReporter {
    pub fn new(promote_warnings: bool) -> Self {
        Self { promote_warnings }
    }

    pub fn report(&self, issues: Vec<ValidationIssue>, totals: ModelTotals) -> ValidationReport {
        let mut issues: Vec<ValidationIssue> = if self.promote_warnings {
            issues.iter().map(ValidationIssue::promoted).collect()
        } else {
            issues
        };
        issues.sort_by(ValidationIssue::report_order);

        let mut summary = ReportSummary {
            entities: totals.entities,
            references: totals.references,
            resolved_edges: totals.resolved_edges,
            ..Default::default()
        };
        for issue in &issues {
            match issue.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
            }
            *summary
                .by_code
                .entry(issue.code.as_str().to_string())
                .or_default() += 1;
        }

        ValidationReport {
            valid: summary.errors == 0,
            issues,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_issues() -> Vec<ValidationIssue> {
        vec![
            ValidationIssue::new(IssueCode::NamingConventionWarning, "svc-1", "bad name")
                .with_predicate("supports-goals"),
            ValidationIssue::new(IssueCode::DanglingReference, "svc-1", "missing goal-x")
                .with_predicate("supports-goals")
                .with_related(["goal-x"]),
            ValidationIssue::new(IssueCode::DuplicateId, "goal-1", "duplicate"),
        ]
    }

    #[test]
    fn test_report_sorting() {
        let report = DiagnosticsReporter::default().report(sample_issues(), ModelTotals::default());
        let codes: Vec<_> = report.issues.iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec![
                IssueCode::DuplicateId,
                IssueCode::DanglingReference,
                IssueCode::NamingConventionWarning
            ]
        );
        assert!(!report.valid);
        assert_eq!(report.summary.errors, 2);
        assert_eq!(report.summary.warnings, 1);
        assert_eq!(report.summary.by_code["DANGLING_REFERENCE"], 1);
    }

    #[test]
    fn test_warnings_only_is_valid() {
        let issues = vec![ValidationIssue::new(
            IssueCode::MalformedListWarning,
            "svc-1",
            "whitespace in list",
        )];
        let report = DiagnosticsReporter::new(false).report(issues.clone(), ModelTotals::default());
        assert!(report.valid);

        let strict = DiagnosticsReporter::new(true).report(issues, ModelTotals::default());
        assert!(!strict.valid);
        assert_eq!(strict.issues[0].severity, Severity::Error);
        assert_eq!(strict.issues[0].code, IssueCode::MalformedListWarning);
    }

    #[test]
    fn test_json_codes() {
        let report = DiagnosticsReporter::default().report(sample_issues(), ModelTotals::default());
        let json = report.to_json().unwrap();
        assert!(json.contains("\"DANGLING_REFERENCE\""));
        assert!(json.contains("\"sourceId\": \"svc-1\""));
        assert!(json.contains("\"severity\": \"error\""));
    }

    #[test]
    fn test_issue_display() {
        let issue = &sample_issues()[1];
        assert_eq!(
            issue.to_string(),
            "[error] DANGLING_REFERENCE svc-1 (supports-goals): missing goal-x"
        );
    }
}
