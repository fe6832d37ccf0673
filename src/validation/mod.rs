//! Validation functionality
//!
//! Runs the reference validation pipeline over a complete model:
//! - Entity registration (duplicate ids)
//! - Reference normalization (four encodings to one canonical shape)
//! - Relationship validation (existence, type, direction, cardinality, naming)
//! - Ownership cycle detection
//! - Diagnostics reporting
//!
//! Each stage only reads the output of the previous one.

pub mod config;
pub mod cycles;
pub mod naming;
pub mod normalizer;
pub mod relationships;
pub mod report;
pub mod specialization;

pub use config::{ConfigError, ValidatorConfig};
pub use cycles::CycleDetector;
pub use normalizer::{Normalized, ReferenceNormalizer};
pub use relationships::{RelationshipValidationResult, RelationshipValidator};
pub use report::{
    DiagnosticsReporter, IssueCode, ModelTotals, ReportSummary, Severity, ValidationIssue,
    ValidationReport,
};
pub use specialization::TypeHierarchy;

use crate::catalog::{CatalogError, RuleCatalog};
use crate::model::EntityRegistry;
use crate::models::{
    ArchitectureModel, CanonicalReference, RawRelationshipDeclaration, ValidatedGraph,
};
use std::collections::HashSet;
use tracing::{debug, info};

/// Everything a validation run produces
#[derive(Debug)]
pub struct ValidationOutcome {
    pub report: ValidationReport,
    pub graph: ValidatedGraph,
    pub registry: EntityRegistry,
}

/// Validates complete architecture models against a rule catalog
///
/// # Example
///
/// ```rust
/// use arch_model_sdk::models::{
///     ArchitectureModel, EncodingPattern, Entity, Layer, LayerDocument, RawRelationshipDeclaration,
/// };
/// use arch_model_sdk::validation::{IssueCode, ModelValidator, ValidatorConfig};
///
/// let model = ArchitectureModel::new().with_document(
///     LayerDocument::new(Layer::Business)
///         .with_entity(Entity::new("svc-1", Layer::Business, "BusinessService"))
///         .with_declaration(RawRelationshipDeclaration::new(
///             "svc-1",
///             EncodingPattern::DotNotation,
///             "motivation.supports-goals",
///             "goal-x",
///             Layer::Business,
///         )),
/// );
///
/// let validator = ModelValidator::new(ValidatorConfig::default()).unwrap();
/// let outcome = validator.validate(model);
/// assert!(!outcome.report.valid);
/// assert_eq!(outcome.report.issues[0].code, IssueCode::DanglingReference);
/// ```
#[derive(Debug, Clone)]
pub struct ModelValidator {
    catalog: RuleCatalog,
    config: ValidatorConfig,
}

impl ModelValidator {
    /// Create a validator with the builtin catalog extended by the config
    pub fn new(config: ValidatorConfig) -> Result<Self, CatalogError> {
        let catalog = RuleCatalog::from_config(&config)?;
        Ok(Self { catalog, config })
    }

    /// Create a validator with an explicit catalog
    pub fn with_catalog(catalog: RuleCatalog, config: ValidatorConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a model
    pub fn validate(&self, model: ArchitectureModel) -> ValidationOutcome {
        info!(
            "Validating model with {} documents, {} entities, {} declarations",
            model.documents.len(),
            model.entity_count(),
            model.declaration_count()
        );

        let mut issues = Vec::new();
        let mut registry = EntityRegistry::new();
        let mut declarations = Vec::with_capacity(model.declaration_count());
        for document in model.documents {
            let mut kept = HashSet::new();
            let mut rejected = HashSet::new();
            for entity in document.entities {
                let id = entity.id.clone();
                match registry.register(entity) {
                    Ok(()) => {
                        kept.insert(id);
                    }
                    Err(e) => {
                        issues.push(
                            ValidationIssue::new(IssueCode::DuplicateId, &e.id, e.to_string())
                                .with_related([e.id.as_str()]),
                        );
                        rejected.insert(id);
                    }
                }
            }
            // Declarations of a discarded duplicate go with it, unless the
            // surviving entity comes from the same document
            let discarded = |id: &String| rejected.contains(id) && !kept.contains(id);
            let before = declarations.len();
            declarations.extend(
                document
                    .declarations
                    .into_iter()
                    .filter(|d| !discarded(&d.source_id)),
            );
            if !rejected.is_empty() {
                debug!(
                    "Dropped declarations of {} duplicate id(s); kept {}",
                    rejected.len(),
                    declarations.len() - before
                );
            }
        }
        debug!("Registered {} entities", registry.len());

        let (references, normalize_issues) = self.normalize(&registry, &declarations);
        issues.extend(normalize_issues);
        debug!(
            "Normalized {} of {} declarations",
            references.len(),
            declarations.len()
        );

        let validated = RelationshipValidator::new(&self.catalog, &registry, &self.config)
            .validate(&references);
        issues.extend(validated.issues);

        issues.extend(CycleDetector::new().detect(&validated.edges));

        let graph = ValidatedGraph::from_edges(validated.edges);
        let report = DiagnosticsReporter::new(self.config.promote_warnings).report(
            issues,
            ModelTotals {
                entities: registry.len(),
                references: references.len(),
                resolved_edges: graph.edge_count(),
            },
        );
        info!(
            "Validation finished: {} errors, {} warnings",
            report.summary.errors, report.summary.warnings
        );

        ValidationOutcome {
            report,
            graph,
            registry,
        }
    }

    #[cfg(feature = "parallel")]
    fn normalize(
        &self,
        registry: &EntityRegistry,
        declarations: &[RawRelationshipDeclaration],
    ) -> (Vec<CanonicalReference>, Vec<ValidationIssue>) {
        use rayon::prelude::*;

        let normalizer = ReferenceNormalizer::new(&self.catalog, registry);
        if !self.config.parallel {
            return normalizer.normalize_all(declarations);
        }

        let results: Vec<Normalized> = declarations
            .par_iter()
            .map(|decl| normalizer.normalize(decl))
            .collect();
        let mut references = Vec::with_capacity(results.len());
        let mut issues = Vec::new();
        for result in results {
            references.extend(result.reference);
            issues.extend(result.issues);
        }
        (references, issues)
    }

    #[cfg(not(feature = "parallel"))]
    fn normalize(
        &self,
        registry: &EntityRegistry,
        declarations: &[RawRelationshipDeclaration],
    ) -> (Vec<CanonicalReference>, Vec<ValidationIssue>) {
        if self.config.parallel {
            debug!("Parallel validation requested but the `parallel` feature is disabled");
        }
        ReferenceNormalizer::new(&self.catalog, registry).normalize_all(declarations)
    }
}
