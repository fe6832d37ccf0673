//! Reference normalization
//!
//! Collapses the four declaration encodings into [`CanonicalReference`]s.
//! Rule metadata (target layer and type, cardinality, strength) comes from
//! the catalog, the source type from the registry.

use super::naming::{canonical_predicate, layer_prefix, looks_like_identifier};
use super::report::{IssueCode, ValidationIssue};
use crate::catalog::RuleCatalog;
use crate::model::EntityRegistry;
use crate::models::{CanonicalReference, EncodingPattern, RawRelationshipDeclaration, RawValue};

/// Result of normalizing one declaration
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub reference: Option<CanonicalReference>,
    pub issues: Vec<ValidationIssue>,
}

/// Split tokens, trim them and drop empty ones.
///
/// The flag is set when any token needed trimming or was empty.
fn clean_tokens<'v>(tokens: impl IntoIterator<Item = &'v str>) -> (Vec<String>, bool) {
    let mut ids = Vec::new();
    let mut malformed = false;
    for token in tokens {
        let trimmed = token.trim();
        if trimmed.len() != token.len() || trimmed.is_empty() {
            malformed = true;
        }
        if !trimmed.is_empty() {
            ids.push(trimmed.to_string());
        }
    }
    (ids, malformed)
}

/// Ids of a comma-joined dot-notation value; the empty string holds none
fn split_id_list(value: &str) -> (Vec<String>, bool) {
    if value.is_empty() {
        return (Vec::new(), false);
    }
    clean_tokens(value.split(','))
}

/// Converts raw declarations into canonical references
pub struct ReferenceNormalizer<'a> {
    catalog: &'a RuleCatalog,
    registry: &'a EntityRegistry,
}

impl<'a> ReferenceNormalizer<'a> {
    pub fn new(catalog: &'a RuleCatalog, registry: &'a EntityRegistry) -> Self {
        Self { catalog, registry }
    }

    /// Normalize a single declaration
    pub fn normalize(&self, decl: &RawRelationshipDeclaration) -> Normalized {
        let mut out = Normalized::default();

        let Some(source) = self.registry.lookup(&decl.source_id) else {
            out.issues.push(
                ValidationIssue::new(
                    IssueCode::UnknownSource,
                    &decl.source_id,
                    format!(
                        "Declaration '{}' in layer {} belongs to unknown entity '{}'",
                        decl.predicate_raw, decl.declared_at_layer, decl.source_id
                    ),
                )
                .with_predicate(&decl.predicate_raw),
            );
            return out;
        };

        let predicate = canonical_predicate(&decl.predicate_raw, decl.pattern);
        let Some(rule) = self.catalog.rule(&source.entity_type, &predicate) else {
            out.issues.push(
                ValidationIssue::new(
                    IssueCode::UnknownPredicate,
                    &decl.source_id,
                    format!(
                        "No relationship rule for ({}, {}) (declared as '{}')",
                        source.entity_type, predicate, decl.predicate_raw
                    ),
                )
                .with_predicate(&predicate),
            );
            return out;
        };

        if let Some(prefix) = layer_prefix(&decl.predicate_raw, decl.pattern) {
            if prefix != rule.target_layer {
                out.issues.push(
                    ValidationIssue::new(
                        IssueCode::LayerPrefixMismatchWarning,
                        &decl.source_id,
                        format!(
                            "'{}' names layer {} but {} targets layer {}",
                            decl.predicate_raw, prefix, predicate, rule.target_layer
                        ),
                    )
                    .with_predicate(&predicate),
                );
            }
        }

        let Some(target_ids) = self.target_ids(decl, &predicate, &mut out.issues) else {
            return out;
        };

        out.reference = Some(CanonicalReference {
            source_id: source.id.clone(),
            source_type: source.entity_type.clone(),
            source_layer: source.layer,
            predicate,
            raw_predicate: decl.predicate_raw.clone(),
            pattern: decl.pattern,
            declared_at_layer: decl.declared_at_layer,
            target_layer: rule.target_layer,
            target_type: rule.target_type.clone(),
            target_ids,
            cardinality_declared: rule.cardinality,
            strength: rule.strength,
            required: rule.required,
        });
        out
    }

    /// Normalize declarations in order
    pub fn normalize_all<'d>(
        &self,
        declarations: impl IntoIterator<Item = &'d RawRelationshipDeclaration>,
    ) -> (Vec<CanonicalReference>, Vec<ValidationIssue>) {
        let mut references = Vec::new();
        let mut issues = Vec::new();
        for decl in declarations {
            let normalized = self.normalize(decl);
            references.extend(normalized.reference);
            issues.extend(normalized.issues);
        }
        (references, issues)
    }

    /// Target ids by encoding; `None` drops the declaration
    fn target_ids(
        &self,
        decl: &RawRelationshipDeclaration,
        predicate: &str,
        issues: &mut Vec<ValidationIssue>,
    ) -> Option<Vec<String>> {
        let malformed_list = |detail: &str| {
            ValidationIssue::new(
                IssueCode::MalformedListWarning,
                &decl.source_id,
                format!("'{}' {}", decl.predicate_raw, detail),
            )
            .with_predicate(predicate)
        };

        match (decl.pattern, &decl.raw_value) {
            (EncodingPattern::Extension | EncodingPattern::Nested, RawValue::List(items)) => {
                let (ids, malformed) = clean_tokens(items.iter().map(String::as_str));
                if malformed {
                    issues.push(malformed_list(
                        "contains empty ids or ids with surrounding whitespace",
                    ));
                }
                Some(ids)
            }
            (EncodingPattern::Extension | EncodingPattern::Nested, RawValue::Single(value)) => {
                issues.push(malformed_list(&format!(
                    "expects a list of ids, got a single value for {} encoding",
                    decl.pattern
                )));
                Some(split_id_list(value).0)
            }
            (EncodingPattern::DotNotation, RawValue::Single(value)) => {
                let (ids, malformed) = split_id_list(value);
                if malformed {
                    issues.push(malformed_list(
                        "must join ids with commas and no surrounding whitespace",
                    ));
                }
                Some(ids)
            }
            (EncodingPattern::DotNotation, RawValue::List(items)) => {
                issues.push(malformed_list(
                    "expects a comma-joined string, got a list for dot-notation encoding",
                ));
                Some(clean_tokens(items.iter().map(String::as_str)).0)
            }
            (EncodingPattern::Native, value) => {
                let values: Vec<&str> = match value {
                    RawValue::Single(v) => vec![v.as_str()],
                    RawValue::List(items) => {
                        issues.push(malformed_list("is a native field and expects a single value"));
                        items.iter().map(String::as_str).collect()
                    }
                };
                if let Some(bad) = values.iter().find(|v| !looks_like_identifier(v)) {
                    issues.push(
                        ValidationIssue::new(
                            IssueCode::MalformedReferenceWarning,
                            &decl.source_id,
                            format!(
                                "'{}' value '{}' does not look like an identifier",
                                decl.predicate_raw, bad
                            ),
                        )
                        .with_predicate(predicate),
                    );
                    return None;
                }
                Some(values.into_iter().map(str::to_string).collect())
            }
        }
    }
}
