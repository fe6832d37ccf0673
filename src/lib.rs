//! Architecture Model SDK - cross-layer reference validation for layered models
//!
//! Provides unified interfaces for:
//! - The eleven-layer model (layers, entities, relationship declarations)
//! - The relationship rule catalog
//! - Loading layer documents from YAML/JSON
//! - Validation: normalization of the four reference encodings, relationship
//!   checks, ownership cycle detection and diagnostics reporting

pub mod catalog;
#[cfg(feature = "cli")]
pub mod cli;
pub mod model;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use catalog::{CatalogError, RelationshipRule, RuleCatalog, RuleDefinition, TypeDefinition};
pub use model::{DuplicateIdError, EntityRegistry, ModelLoadError, ModelLoader};
pub use validation::{
    ConfigError, IssueCode, ModelValidator, Severity, ValidationIssue, ValidationOutcome,
    ValidationReport, ValidatorConfig,
};

// Re-export models
pub use models::{
    ArchitectureModel, CanonicalReference, EncodingPattern, Entity, Layer, LayerDocument,
    RawRelationshipDeclaration, RawValue, ValidatedGraph,
};
