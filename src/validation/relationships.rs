//! Relationship validation
//!
//! Checks every canonical reference against the rule catalog and the entity
//! registry: existence, type, direction, cardinality and naming. Validation
//! never stops at the first finding; every reference is checked.
//!
//! Specialization references are checked first with exact type matching.
//! The edges they resolve to define the type hierarchy that every other
//! reference is then checked against.

use super::config::ValidatorConfig;
use super::naming::naming_violation;
use super::report::{IssueCode, ValidationIssue};
use super::specialization::TypeHierarchy;
use crate::catalog::{RelationshipRule, RuleCatalog};
use crate::model::EntityRegistry;
use crate::models::{
    AllowedDirection, CanonicalReference, Cardinality, Layer, RelationshipKind, ResolvedEdge,
};
use std::collections::{BTreeSet, HashSet};

/// Findings and resolved edges for a set of references
#[derive(Debug, Clone, Default)]
pub struct RelationshipValidationResult {
    pub edges: Vec<ResolvedEdge>,
    pub issues: Vec<ValidationIssue>,
}

impl RelationshipValidationResult {
    fn merge(&mut self, other: RelationshipValidationResult) {
        self.edges.extend(other.edges);
        self.issues.extend(other.issues);
    }
}

/// Relationship validator
pub struct RelationshipValidator<'a> {
    catalog: &'a RuleCatalog,
    registry: &'a EntityRegistry,
    config: &'a ValidatorConfig,
}

impl<'a> RelationshipValidator<'a> {
    /// Create a new relationship validator
    pub fn new(
        catalog: &'a RuleCatalog,
        registry: &'a EntityRegistry,
        config: &'a ValidatorConfig,
    ) -> Self {
        Self {
            catalog,
            registry,
            config,
        }
    }

    /// Validate all references of a model
    pub fn validate(&self, references: &[CanonicalReference]) -> RelationshipValidationResult {
        let mut result = RelationshipValidationResult {
            issues: self.check_entity_layers(),
            ..Default::default()
        };

        let (specializations, others): (Vec<&CanonicalReference>, Vec<&CanonicalReference>) =
            references.iter().partition(|r| {
                self.rule_for(r)
                    .is_some_and(|rule| rule.kind == RelationshipKind::Specialization)
            });

        result.merge(self.check_all(&specializations, &TypeHierarchy::exact()));

        let (hierarchy, cycle_issues) = TypeHierarchy::build(&result.edges, self.registry);
        if !cycle_issues.is_empty() {
            tracing::warn!("Found {} specialization cycle(s)", cycle_issues.len());
        }
        result.issues.extend(cycle_issues);

        result.merge(self.check_all(&others, &hierarchy));
        result.issues.extend(self.check_required(references));
        result
    }

    #[cfg(feature = "parallel")]
    fn check_all(
        &self,
        references: &[&CanonicalReference],
        hierarchy: &TypeHierarchy,
    ) -> RelationshipValidationResult {
        use rayon::prelude::*;

        let results: Vec<RelationshipValidationResult> = if self.config.parallel {
            references
                .par_iter()
                .map(|r| self.check_reference(r, hierarchy))
                .collect()
        } else {
            references
                .iter()
                .map(|r| self.check_reference(r, hierarchy))
                .collect()
        };
        results.into_iter().fold(Default::default(), |mut acc, r| {
            acc.merge(r);
            acc
        })
    }

    #[cfg(not(feature = "parallel"))]
    fn check_all(
        &self,
        references: &[&CanonicalReference],
        hierarchy: &TypeHierarchy,
    ) -> RelationshipValidationResult {
        let mut acc = RelationshipValidationResult::default();
        for reference in references {
            acc.merge(self.check_reference(reference, hierarchy));
        }
        acc
    }

    fn rule_for(&self, reference: &CanonicalReference) -> Option<&'a RelationshipRule> {
        self.catalog.rule(&reference.source_type, &reference.predicate)
    }

    /// Check one reference against its rule
    pub fn check_reference(
        &self,
        reference: &CanonicalReference,
        hierarchy: &TypeHierarchy,
    ) -> RelationshipValidationResult {
        let mut result = RelationshipValidationResult::default();
        let Some(rule) = self.rule_for(reference) else {
            // Normalization only emits references that have a rule
            return result;
        };
        let source_id = reference.source_id.as_str();
        let predicate = reference.predicate.as_str();
        let issue = |code: IssueCode, message: String| {
            ValidationIssue::new(code, source_id, message).with_predicate(predicate)
        };

        let mut seen = HashSet::new();
        let mut duplicates = BTreeSet::new();
        let mut unique = Vec::with_capacity(reference.target_ids.len());
        for id in &reference.target_ids {
            if seen.insert(id.as_str()) {
                unique.push(id.as_str());
            } else {
                duplicates.insert(id.as_str());
            }
        }
        if !duplicates.is_empty() {
            result.issues.push(
                issue(
                    IssueCode::DuplicateTargetWarning,
                    format!(
                        "{} lists {} more than once",
                        predicate,
                        duplicates.iter().copied().collect::<Vec<_>>().join(", ")
                    ),
                )
                .with_related(duplicates.iter().copied()),
            );
        }

        let source_layer = self
            .registry
            .lookup(source_id)
            .map_or(reference.source_layer, |e| e.layer);

        for id in unique {
            let Some(target) = self.registry.lookup(id) else {
                result.issues.push(
                    issue(
                        IssueCode::DanglingReference,
                        format!("Target '{}' of {} does not exist", id, predicate),
                    )
                    .with_related([id]),
                );
                continue;
            };
            let type_ok = hierarchy.is_compatible(&target.entity_type, &rule.target_type);
            if !type_ok {
                result.issues.push(
                    issue(
                        IssueCode::TypeMismatch,
                        format!(
                            "Target '{}' is a {}, but {} expects {}",
                            id, target.entity_type, predicate, rule.target_type
                        ),
                    )
                    .with_related([id]),
                );
            }

            if !self.direction_allowed(rule.direction, source_layer, target.layer) {
                result.issues.push(
                    issue(
                        IssueCode::DirectionViolation,
                        format!(
                            "{} is {} but points from layer {} to layer {} ('{}')",
                            predicate,
                            direction_name(rule.direction),
                            source_layer,
                            target.layer,
                            id
                        ),
                    )
                    .with_related([id]),
                );
            }

            if type_ok {
                result.edges.push(ResolvedEdge {
                    source_id: source_id.to_string(),
                    predicate: predicate.to_string(),
                    inverse_predicate: rule.inverse_predicate.clone(),
                    target_id: id.to_string(),
                    kind: rule.kind,
                });
            }
        }

        // Bounds apply to the declared ids; duplicates and dangling ids are reported above
        let declared = reference.target_ids.len();
        if let Some(code) = cardinality_finding(rule.cardinality, rule.required, declared) {
            let message = if code == IssueCode::MissingRequiredReference {
                format!("Required reference {} has no targets", predicate)
            } else {
                format!(
                    "{} is {} but declares {} target(s)",
                    predicate, rule.cardinality, declared
                )
            };
            result.issues.push(issue(code, message));
        }

        if self.config.check_naming {
            if let Some(expected) = naming_violation(&reference.raw_predicate, reference.pattern) {
                result.issues.push(issue(
                    IssueCode::NamingConventionWarning,
                    format!(
                        "'{}' should be {} in {} encoding",
                        reference.raw_predicate, expected, reference.pattern
                    ),
                ));
            }
        }

        result
    }

    fn direction_allowed(&self, direction: AllowedDirection, source: Layer, target: Layer) -> bool {
        match direction {
            AllowedDirection::UpwardOnly => {
                source > target || (source == target && self.config.allow_same_layer_references)
            }
            AllowedDirection::IntraLayer => source == target,
            AllowedDirection::Bidirectional => true,
        }
    }

    /// Entities whose type the catalog places in another layer
    fn check_entity_layers(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for entity in self.registry.iter() {
            match self.catalog.type_layer(&entity.entity_type) {
                Some(layer) if layer != entity.layer => issues.push(ValidationIssue::new(
                    IssueCode::LayerMismatch,
                    &entity.id,
                    format!(
                        "{} belongs to layer {}, but '{}' is declared in layer {}",
                        entity.entity_type, layer, entity.id, entity.layer
                    ),
                )),
                Some(_) => {}
                None => tracing::debug!(
                    "Entity '{}' has type {} unknown to the catalog",
                    entity.id,
                    entity.entity_type
                ),
            }
        }
        issues
    }

    /// Entities missing a declaration for a required rule
    fn check_required(&self, references: &[CanonicalReference]) -> Vec<ValidationIssue> {
        let declared: HashSet<(&str, &str)> = references
            .iter()
            .map(|r| (r.source_id.as_str(), r.predicate.as_str()))
            .collect();

        let mut issues = Vec::new();
        for entity in self.registry.iter() {
            for rule in self.catalog.required_rules_for(&entity.entity_type) {
                if !declared.contains(&(entity.id.as_str(), rule.predicate.as_str())) {
                    issues.push(
                        ValidationIssue::new(
                            IssueCode::MissingRequiredReference,
                            &entity.id,
                            format!(
                                "{} '{}' must declare {} ({})",
                                entity.entity_type, entity.id, rule.predicate, rule.target_type
                            ),
                        )
                        .with_predicate(&rule.predicate),
                    );
                }
            }
        }
        issues
    }
}

fn direction_name(direction: AllowedDirection) -> &'static str {
    match direction {
        AllowedDirection::UpwardOnly => "upward-only",
        AllowedDirection::IntraLayer => "intra-layer",
        AllowedDirection::Bidirectional => "bidirectional",
    }
}

/// At most one cardinality finding per reference
fn cardinality_finding(
    cardinality: Cardinality,
    required: bool,
    count: usize,
) -> Option<IssueCode> {
    if cardinality == Cardinality::ManyToMany {
        return (count == 0 && required).then_some(IssueCode::MissingRequiredReference);
    }
    let (min, max) = cardinality.bounds();
    if count < min || max.is_some_and(|m| count > m) {
        Some(IssueCode::CardinalityViolation)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EncodingPattern, Entity, Strength};

    fn registry(entities: Vec<Entity>) -> EntityRegistry {
        let mut registry = EntityRegistry::new();
        for entity in entities {
            registry.register(entity).unwrap();
        }
        registry
    }

    fn reference(
        catalog: &RuleCatalog,
        source: &Entity,
        predicate: &str,
        targets: &[&str],
    ) -> CanonicalReference {
        let rule = catalog.rule(&source.entity_type, predicate).unwrap();
        CanonicalReference {
            source_id: source.id.clone(),
            source_type: source.entity_type.clone(),
            source_layer: source.layer,
            predicate: predicate.to_string(),
            raw_predicate: format!("x-{}", predicate),
            pattern: EncodingPattern::Extension,
            declared_at_layer: source.layer,
            target_layer: rule.target_layer,
            target_type: rule.target_type.clone(),
            target_ids: targets.iter().map(|s| s.to_string()).collect(),
            cardinality_declared: rule.cardinality,
            strength: Strength::Medium,
            required: rule.required,
        }
    }

    fn codes(result: &RelationshipValidationResult) -> Vec<IssueCode> {
        result.issues.iter().map(|i| i.code).collect()
    }

    #[test]
    fn test_valid_upward_reference() {
        let catalog = RuleCatalog::builtin();
        let node = Entity::new("node-1", Layer::Technology, "Node");
        let registry = registry(vec![
            node.clone(),
            Entity::new("principle-1", Layer::Motivation, "Principle"),
        ]);
        let config = ValidatorConfig::default();
        let validator = RelationshipValidator::new(&catalog, &registry, &config);

        let result = validator.validate(&[reference(
            &catalog,
            &node,
            "governed-by-principles",
            &["principle-1"],
        )]);
        assert!(result.issues.is_empty(), "{:?}", result.issues);
        assert_eq!(result.edges.len(), 1);
        assert_eq!(result.edges[0].inverse_predicate, "governs");
    }

    #[test]
    fn test_dangling_and_duplicate_targets() {
        let catalog = RuleCatalog::builtin();
        let svc = Entity::new("svc-1", Layer::Business, "BusinessService");
        let registry = registry(vec![
            svc.clone(),
            Entity::new("goal-1", Layer::Motivation, "Goal"),
        ]);
        let config = ValidatorConfig::default();
        let validator = RelationshipValidator::new(&catalog, &registry, &config);

        let result = validator.validate(&[reference(
            &catalog,
            &svc,
            "supports-goals",
            &["goal-1", "goal-x", "goal-1"],
        )]);
        let mut found = codes(&result);
        found.sort_by_key(|c| c.as_str());
        assert_eq!(
            found,
            vec![IssueCode::DanglingReference, IssueCode::DuplicateTargetWarning]
        );
        let dangling = result
            .issues
            .iter()
            .find(|i| i.code == IssueCode::DanglingReference)
            .unwrap();
        assert_eq!(dangling.related_ids, vec!["goal-x"]);
        assert_eq!(result.edges.len(), 1);
    }

    #[test]
    fn test_one_to_one_cardinality() {
        let catalog = RuleCatalog::builtin();
        let span = Entity::new("span-1", Layer::Apm, "Span");
        let registry = registry(vec![
            span.clone(),
            Entity::new("op-1", Layer::Api, "Operation"),
            Entity::new("op-2", Layer::Api, "Operation"),
        ]);
        let config = ValidatorConfig::default();
        let validator = RelationshipValidator::new(&catalog, &registry, &config);

        for targets in [&[][..], &["op-1", "op-2"][..]] {
            let mut r = reference(&catalog, &span, "operationId", targets);
            r.raw_predicate = "operationId".to_string();
            r.pattern = EncodingPattern::Native;
            let result = validator.validate(&[r]);
            assert_eq!(codes(&result), vec![IssueCode::CardinalityViolation]);
        }
    }

    #[test]
    fn test_one_to_one_counts_declared_ids() {
        let catalog = RuleCatalog::builtin();
        let span = Entity::new("span-1", Layer::Apm, "Span");
        let registry = registry(vec![span.clone(), Entity::new("op-1", Layer::Api, "Operation")]);
        let config = ValidatorConfig::default();
        let validator = RelationshipValidator::new(&catalog, &registry, &config);

        let native = |targets: &[&str]| {
            let mut r = reference(&catalog, &span, "operationId", targets);
            r.raw_predicate = "operationId".to_string();
            r.pattern = EncodingPattern::Native;
            r
        };

        let mut found = codes(&validator.validate(&[native(&["op-1", "op-1"])]));
        found.sort_by_key(|c| c.as_str());
        assert_eq!(
            found,
            vec![IssueCode::CardinalityViolation, IssueCode::DuplicateTargetWarning]
        );

        // A single missing id is only dangling
        let result = validator.validate(&[native(&["op-x"])]);
        assert_eq!(codes(&result), vec![IssueCode::DanglingReference]);
    }

    #[test]
    fn test_type_mismatch() {
        let catalog = RuleCatalog::builtin();
        let svc = Entity::new("svc-1", Layer::Business, "BusinessService");
        let registry = registry(vec![
            svc.clone(),
            Entity::new("outcome-1", Layer::Motivation, "Outcome"),
        ]);
        let config = ValidatorConfig::default();
        let validator = RelationshipValidator::new(&catalog, &registry, &config);

        let result =
            validator.validate(&[reference(&catalog, &svc, "supports-goals", &["outcome-1"])]);
        assert_eq!(codes(&result), vec![IssueCode::TypeMismatch]);
        assert!(result.edges.is_empty());
    }

    #[test]
    fn test_specialized_target_is_compatible() {
        let catalog = RuleCatalog::builtin();
        let device = Entity::new("dev-1", Layer::Technology, "Device");
        let database = Entity::new("db-1", Layer::Datastore, "Database");
        let registry = registry(vec![
            device.clone(),
            database.clone(),
            Entity::new("node-1", Layer::Technology, "Node"),
        ]);
        let config = ValidatorConfig::default();
        let validator = RelationshipValidator::new(&catalog, &registry, &config);

        let result = validator.validate(&[
            reference(&catalog, &database, "deployed-on", &["dev-1"]),
            reference(&catalog, &device, "specializes", &["node-1"]),
        ]);
        assert!(result.issues.is_empty(), "{:?}", result.issues);
        assert_eq!(result.edges.len(), 2);
    }

    #[test]
    fn test_direction_violation_for_misplaced_target() {
        let catalog = RuleCatalog::builtin();
        let node = Entity::new("node-1", Layer::Technology, "Node");
        // A principle declared in the APM layer sits below the node
        let registry = registry(vec![
            node.clone(),
            Entity::new("principle-1", Layer::Apm, "Principle"),
        ]);
        let config = ValidatorConfig::default();
        let validator = RelationshipValidator::new(&catalog, &registry, &config);

        let result = validator.validate(&[reference(
            &catalog,
            &node,
            "governed-by-principles",
            &["principle-1"],
        )]);
        let mut found = codes(&result);
        found.sort_by_key(|c| c.as_str());
        assert_eq!(
            found,
            vec![IssueCode::DirectionViolation, IssueCode::LayerMismatch]
        );
    }

    #[test]
    fn test_same_layer_upward_reference_is_configurable() {
        let catalog = RuleCatalog::builtin()
            .extend(
                &[],
                &[crate::catalog::RuleDefinition::new("Node", "depends-on-nodes", "Node")],
            )
            .unwrap();
        let node = Entity::new("node-1", Layer::Technology, "Node");
        let registry = registry(vec![
            node.clone(),
            Entity::new("node-2", Layer::Technology, "Node"),
        ]);
        let refs = [reference(&catalog, &node, "depends-on-nodes", &["node-2"])];

        let config = ValidatorConfig::default();
        let result = RelationshipValidator::new(&catalog, &registry, &config).validate(&refs);
        assert!(result.issues.is_empty());

        let strict = ValidatorConfig::default().with_same_layer_references(false);
        let result = RelationshipValidator::new(&catalog, &registry, &strict).validate(&refs);
        assert_eq!(codes(&result), vec![IssueCode::DirectionViolation]);
    }

    #[test]
    fn test_naming_warning_can_be_disabled() {
        let catalog = RuleCatalog::builtin();
        let svc = Entity::new("svc-1", Layer::Business, "BusinessService");
        let registry = registry(vec![
            svc.clone(),
            Entity::new("goal-1", Layer::Motivation, "Goal"),
        ]);
        let mut r = reference(&catalog, &svc, "supports-goals", &["goal-1"]);
        r.raw_predicate = "x-supportsGoals".to_string();

        let config = ValidatorConfig::default();
        let result = RelationshipValidator::new(&catalog, &registry, &config)
            .validate(std::slice::from_ref(&r));
        assert_eq!(codes(&result), vec![IssueCode::NamingConventionWarning]);

        let relaxed = ValidatorConfig::default().with_check_naming(false);
        let result = RelationshipValidator::new(&catalog, &registry, &relaxed).validate(&[r]);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_missing_required_reference() {
        let catalog = RuleCatalog::builtin();
        let registry = registry(vec![Entity::new("route-1", Layer::Navigation, "Route")]);
        let config = ValidatorConfig::default();
        let validator = RelationshipValidator::new(&catalog, &registry, &config);

        let result = validator.validate(&[]);
        assert_eq!(codes(&result), vec![IssueCode::MissingRequiredReference]);
        assert_eq!(result.issues[0].predicate.as_deref(), Some("renders-view"));
    }

    #[test]
    fn test_cardinality_finding() {
        use Cardinality::*;
        assert_eq!(cardinality_finding(OneToOne, false, 1), None);
        assert_eq!(
            cardinality_finding(OneToOne, false, 2),
            Some(IssueCode::CardinalityViolation)
        );
        assert_eq!(
            cardinality_finding(OneToMany, false, 0),
            Some(IssueCode::CardinalityViolation)
        );
        assert_eq!(cardinality_finding(OneToMany, false, 5), None);
        assert_eq!(cardinality_finding(ManyToMany, false, 0), None);
        assert_eq!(
            cardinality_finding(ManyToMany, true, 0),
            Some(IssueCode::MissingRequiredReference)
        );
    }
}
