//! Relationship rule catalog
//!
//! The catalog is the single source of truth for which relationships a model
//! may declare: entity types and their layers, and the allowed
//! `(source type, predicate) -> target type` tuples with cardinality,
//! direction and strength. It is built once, from the builtin table plus
//! optional custom types and rules, and is read-only afterwards.
//!
//! # Example
//!
//! ```rust
//! use arch_model_sdk::catalog::RuleCatalog;
//! use arch_model_sdk::models::Layer;
//!
//! let catalog = RuleCatalog::builtin();
//! let rule = catalog.rule("BusinessService", "supports-goals").unwrap();
//! assert_eq!(rule.target_type, "Goal");
//! assert_eq!(rule.target_layer, Layer::Motivation);
//! ```

mod builtin;

use crate::models::{AllowedDirection, Cardinality, Layer, RelationshipKind, Strength};
use crate::validation::config::ValidatorConfig;
use crate::validation::naming::is_kebab_case;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Errors raised while building or extending a catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Two rules share the same `(source type, predicate)` key
    #[error("Duplicate rule for ({source_type}, {predicate})")]
    DuplicateRule {
        source_type: String,
        predicate: String,
    },

    /// A rule names an entity type the catalog does not know
    #[error("Rule ({source_type}, {predicate}) references unknown entity type '{entity_type}'")]
    UnknownType {
        source_type: String,
        predicate: String,
        entity_type: String,
    },

    /// Non-native predicates must be kebab-case
    #[error("Predicate '{0}' is not kebab-case")]
    InvalidPredicate(String),

    /// An entity type was declared in two layers
    #[error("Entity type '{entity_type}' already belongs to layer {existing}, cannot add it to {layer}")]
    ConflictingTypeLayer {
        entity_type: String,
        layer: Layer,
        existing: Layer,
    },

    /// The rule's direction cannot hold for the layers of its types
    #[error("Rule ({source_type}, {predicate}) is {direction:?} but links {source_layer} to {target_layer}")]
    InconsistentDirection {
        source_type: String,
        predicate: String,
        direction: AllowedDirection,
        source_layer: Layer,
        target_layer: Layer,
    },
}

/// A custom entity type, as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub name: String,
    pub layer: Layer,
}

fn default_direction() -> AllowedDirection {
    AllowedDirection::UpwardOnly
}

fn default_kind() -> RelationshipKind {
    RelationshipKind::Reference
}

fn default_cardinality() -> Cardinality {
    Cardinality::ManyToMany
}

/// A custom rule, as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub source_type: String,
    pub predicate: String,
    /// Defaults to `inverse-of-{predicate}`
    #[serde(default)]
    pub inverse_predicate: Option<String>,
    pub target_type: String,
    #[serde(default = "default_cardinality")]
    pub cardinality: Cardinality,
    #[serde(default = "default_direction")]
    pub direction: AllowedDirection,
    #[serde(default = "default_kind")]
    pub kind: RelationshipKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub native: bool,
}

impl RuleDefinition {
    pub fn new(
        source_type: impl Into<String>,
        predicate: impl Into<String>,
        target_type: impl Into<String>,
    ) -> Self {
        Self {
            source_type: source_type.into(),
            predicate: predicate.into(),
            inverse_predicate: None,
            target_type: target_type.into(),
            cardinality: default_cardinality(),
            direction: default_direction(),
            kind: default_kind(),
            required: false,
            native: false,
        }
    }

    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    pub fn with_direction(mut self, direction: AllowedDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_kind(mut self, kind: RelationshipKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_inverse(mut self, inverse: impl Into<String>) -> Self {
        self.inverse_predicate = Some(inverse.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn native(mut self) -> Self {
        self.native = true;
        self
    }
}

impl From<&builtin::RuleDef> for RuleDefinition {
    fn from(def: &builtin::RuleDef) -> Self {
        Self {
            source_type: def.source.to_string(),
            predicate: def.predicate.to_string(),
            inverse_predicate: Some(def.inverse.to_string()),
            target_type: def.target.to_string(),
            cardinality: def.cardinality,
            direction: def.direction,
            kind: def.kind,
            required: def.required,
            native: def.native,
        }
    }
}

/// One allowed relationship
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipRule {
    pub source_type: String,
    pub source_layer: Layer,
    pub predicate: String,
    pub inverse_predicate: String,
    pub target_type: String,
    pub target_layer: Layer,
    pub cardinality: Cardinality,
    pub direction: AllowedDirection,
    pub kind: RelationshipKind,
    pub strength: Strength,
    pub required: bool,
    /// The predicate is a native field of the source type (`operationId`, `$ref`)
    pub native: bool,
}

/// Immutable table of entity types and relationship rules
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    rules: Vec<RelationshipRule>,
    /// source type -> predicate -> position in `rules`
    index: HashMap<String, HashMap<String, usize>>,
    type_layers: BTreeMap<String, Layer>,
}

impl RuleCatalog {
    /// The builtin catalog covering all eleven layers
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        for (layer, types) in builtin::ENTITY_TYPES {
            for name in *types {
                if let Err(e) = catalog.add_type(name, *layer) {
                    tracing::error!("Skipping builtin entity type: {}", e);
                }
            }
        }
        for def in builtin::RULES {
            if let Err(e) = catalog.add_rule(RuleDefinition::from(def)) {
                tracing::error!("Skipping builtin rule: {}", e);
            }
        }
        catalog
    }

    /// Builtin catalog extended with the custom types and rules of a config
    pub fn from_config(config: &ValidatorConfig) -> Result<Self, CatalogError> {
        Self::builtin().extend(&config.types, &config.rules)
    }

    /// Return a copy of this catalog with additional types and rules.
    ///
    /// Types are added before rules, so custom rules may reference custom
    /// types.
    pub fn extend(
        mut self,
        types: &[TypeDefinition],
        rules: &[RuleDefinition],
    ) -> Result<Self, CatalogError> {
        for ty in types {
            self.add_type(&ty.name, ty.layer)?;
        }
        for rule in rules {
            self.add_rule(rule.clone())?;
        }
        Ok(self)
    }

    fn add_type(&mut self, name: &str, layer: Layer) -> Result<(), CatalogError> {
        match self.type_layers.get(name) {
            Some(&existing) if existing != layer => Err(CatalogError::ConflictingTypeLayer {
                entity_type: name.to_string(),
                layer,
                existing,
            }),
            Some(_) => Ok(()),
            None => {
                self.type_layers.insert(name.to_string(), layer);
                Ok(())
            }
        }
    }

    fn add_rule(&mut self, def: RuleDefinition) -> Result<(), CatalogError> {
        if self.rule(&def.source_type, &def.predicate).is_some() {
            return Err(CatalogError::DuplicateRule {
                source_type: def.source_type,
                predicate: def.predicate,
            });
        }
        if !def.native && !is_kebab_case(&def.predicate) {
            return Err(CatalogError::InvalidPredicate(def.predicate));
        }

        let layer_of = |entity_type: &str| {
            self.type_layers
                .get(entity_type)
                .copied()
                .ok_or_else(|| CatalogError::UnknownType {
                    source_type: def.source_type.clone(),
                    predicate: def.predicate.clone(),
                    entity_type: entity_type.to_string(),
                })
        };
        let source_layer = layer_of(&def.source_type)?;
        let target_layer = layer_of(&def.target_type)?;

        let consistent = match def.direction {
            AllowedDirection::UpwardOnly => source_layer >= target_layer,
            AllowedDirection::IntraLayer => source_layer == target_layer,
            AllowedDirection::Bidirectional => true,
        };
        if !consistent {
            return Err(CatalogError::InconsistentDirection {
                source_type: def.source_type,
                predicate: def.predicate,
                direction: def.direction,
                source_layer,
                target_layer,
            });
        }

        let inverse_predicate = def
            .inverse_predicate
            .unwrap_or_else(|| format!("inverse-of-{}", def.predicate));
        self.index
            .entry(def.source_type.clone())
            .or_default()
            .insert(def.predicate.clone(), self.rules.len());
        self.rules.push(RelationshipRule {
            strength: def.kind.strength(),
            source_type: def.source_type,
            source_layer,
            predicate: def.predicate,
            inverse_predicate,
            target_type: def.target_type,
            target_layer,
            cardinality: def.cardinality,
            direction: def.direction,
            kind: def.kind,
            required: def.required,
            native: def.native,
        });
        Ok(())
    }

    /// Exact `(source type, predicate)` lookup; there is no wildcard fallback
    pub fn rule(&self, source_type: &str, predicate: &str) -> Option<&RelationshipRule> {
        self.index
            .get(source_type)?
            .get(predicate)
            .map(|&idx| &self.rules[idx])
    }

    /// All rules in definition order
    pub fn rules(&self) -> impl Iterator<Item = &RelationshipRule> {
        self.rules.iter()
    }

    /// Rules whose source is the given type
    pub fn rules_for_source<'a>(
        &'a self,
        source_type: &'a str,
    ) -> impl Iterator<Item = &'a RelationshipRule> + 'a {
        self.rules.iter().filter(move |r| r.source_type == source_type)
    }

    /// Required rules whose source is the given type
    pub fn required_rules_for<'a>(
        &'a self,
        source_type: &'a str,
    ) -> impl Iterator<Item = &'a RelationshipRule> + 'a {
        self.rules_for_source(source_type).filter(|r| r.required)
    }

    /// Layer an entity type belongs to
    pub fn type_layer(&self, entity_type: &str) -> Option<Layer> {
        self.type_layers.get(entity_type).copied()
    }

    /// Entity types with their layers, sorted by name
    pub fn entity_types(&self) -> impl Iterator<Item = (&str, Layer)> {
        self.type_layers.iter().map(|(name, &layer)| (name.as_str(), layer))
    }

    /// Whether `field` is on the native-field allow-list of `entity_type`
    pub fn is_native_field(&self, entity_type: &str, field: &str) -> bool {
        self.rule(entity_type, field).is_some_and(|r| r.native)
    }

    /// Inverse predicate of a rule
    pub fn inverse_of(&self, source_type: &str, predicate: &str) -> Option<&str> {
        self.rule(source_type, predicate).map(|r| r.inverse_predicate.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_is_consistent() {
        // Building through the checked path must not drop anything
        let catalog = RuleCatalog::builtin();
        assert_eq!(catalog.len(), builtin::RULES.len());

        let type_count: usize = builtin::ENTITY_TYPES.iter().map(|(_, t)| t.len()).sum();
        assert_eq!(catalog.entity_types().count(), type_count);
    }

    #[test]
    fn test_every_layer_has_types() {
        let catalog = RuleCatalog::builtin();
        for layer in Layer::ALL {
            assert!(
                catalog.entity_types().any(|(_, l)| l == layer),
                "no entity types in layer {layer}"
            );
        }
    }

    #[test]
    fn test_exact_lookup() {
        let catalog = RuleCatalog::builtin();
        let rule = catalog.rule("Node", "governed-by-principles").unwrap();
        assert_eq!(rule.target_type, "Principle");
        assert_eq!(rule.source_layer, Layer::Technology);
        assert_eq!(rule.direction, AllowedDirection::UpwardOnly);
        assert_eq!(rule.inverse_predicate, "governs");

        assert!(catalog.rule("Goal", "governed-by-principles").is_none());
        assert!(catalog.rule("Node", "governedByPrinciples").is_none());
    }

    #[test]
    fn test_native_fields() {
        let catalog = RuleCatalog::builtin();
        assert!(catalog.is_native_field("Span", "operationId"));
        assert!(catalog.is_native_field("Operation", "$ref"));
        assert!(!catalog.is_native_field("Span", "composes"));
        assert!(!catalog.is_native_field("Goal", "operationId"));
    }

    #[test]
    fn test_strength_follows_kind() {
        let catalog = RuleCatalog::builtin();
        assert_eq!(catalog.rule("Node", "composes").unwrap().strength, Strength::High);
        assert_eq!(
            catalog.rule("BusinessService", "supports-goals").unwrap().strength,
            Strength::Medium
        );
    }

    #[test]
    fn test_extend_with_custom_type_and_rule() {
        let catalog = RuleCatalog::builtin()
            .extend(
                &[TypeDefinition {
                    name: "CostCenter".to_string(),
                    layer: Layer::Business,
                }],
                &[RuleDefinition::new("CostCenter", "funds-goals", "Goal")],
            )
            .unwrap();

        let rule = catalog.rule("CostCenter", "funds-goals").unwrap();
        assert_eq!(rule.inverse_predicate, "inverse-of-funds-goals");
        assert_eq!(rule.cardinality, Cardinality::ManyToMany);
        assert_eq!(catalog.type_layer("CostCenter"), Some(Layer::Business));
    }

    #[test]
    fn test_extend_errors() {
        let err = RuleCatalog::builtin()
            .extend(&[], &[RuleDefinition::new("Node", "composes", "Node")])
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateRule { .. }));

        let err = RuleCatalog::builtin()
            .extend(&[], &[RuleDefinition::new("Node", "runs", "Mainframe")])
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::UnknownType { ref entity_type, .. } if entity_type == "Mainframe"
        ));

        let err = RuleCatalog::builtin()
            .extend(&[], &[RuleDefinition::new("Node", "runsOn", "Node")])
            .unwrap_err();
        assert_eq!(err, CatalogError::InvalidPredicate("runsOn".to_string()));

        let err = RuleCatalog::builtin()
            .extend(
                &[TypeDefinition {
                    name: "Goal".to_string(),
                    layer: Layer::Business,
                }],
                &[],
            )
            .unwrap_err();
        assert!(matches!(err, CatalogError::ConflictingTypeLayer { .. }));

        // Motivation cannot reference Technology upward
        let err = RuleCatalog::builtin()
            .extend(&[], &[RuleDefinition::new("Goal", "hosted-on", "Node")])
            .unwrap_err();
        assert!(matches!(err, CatalogError::InconsistentDirection { .. }));
    }
}
