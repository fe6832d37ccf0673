//! Relationship declarations, before and after normalization
//!
//! A layer document may declare a reference in one of four encodings. The
//! loader tags every declaration with its [`EncodingPattern`] once, at parse
//! time; after normalization every component works on [`CanonicalReference`]
//! only.

use super::layer::Layer;
use serde::{Deserialize, Serialize};

/// The source encoding a relationship declaration was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncodingPattern {
    /// `x-predicate-name: [id, ...]` (extension field of an embedded standard document)
    Extension,
    /// `layer.predicate-name: "id1,id2"`
    DotNotation,
    /// `group: { camelCasePredicate: [id, ...] }`
    Nested,
    /// The field name itself is the predicate, e.g. `operationId` or `$ref`
    Native,
}

impl EncodingPattern {
    /// Classify a field of an entity mapping.
    ///
    /// `depth` is the nesting depth of the field inside the entity (1 for a
    /// direct key, 2 for a key inside a group mapping). `is_native` tells
    /// whether the field is on the native-field allow-list of the entity type.
    /// Returns `None` for ordinary attributes.
    pub fn detect(field: &str, depth: usize, is_native: bool) -> Option<Self> {
        if depth >= 2 {
            return Some(Self::Nested);
        }
        if field.starts_with("x-") {
            return Some(Self::Extension);
        }
        if is_native {
            return Some(Self::Native);
        }
        match field.split_once('.') {
            Some((prefix, rest)) if !rest.is_empty() && Layer::from_prefix(prefix).is_some() => {
                Some(Self::DotNotation)
            }
            _ => None,
        }
    }

    /// Pattern name for messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Extension => "extension",
            Self::DotNotation => "dot-notation",
            Self::Nested => "nested",
            Self::Native => "native",
        }
    }
}

impl std::fmt::Display for EncodingPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Raw value of a declaration as it appeared in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Single(String),
    List(Vec<String>),
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Single(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Single(value)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(values: Vec<String>) -> Self {
        RawValue::List(values)
    }
}

impl From<Vec<&str>> for RawValue {
    fn from(values: Vec<&str>) -> Self {
        RawValue::List(values.into_iter().map(str::to_string).collect())
    }
}

/// A relationship declaration in its source encoding
///
/// # Example
///
/// ```rust
/// use arch_model_sdk::models::{EncodingPattern, Layer, RawRelationshipDeclaration};
///
/// let decl = RawRelationshipDeclaration::new(
///     "svc-1",
///     EncodingPattern::DotNotation,
///     "motivation.supports-goals",
///     "goal-1,goal-2",
///     Layer::Business,
/// );
/// assert_eq!(decl.pattern, EncodingPattern::DotNotation);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRelationshipDeclaration {
    pub source_id: String,
    pub pattern: EncodingPattern,
    /// Field name exactly as written (`x-supports-goals`, `motivation.supportsGoals`, ...)
    pub predicate_raw: String,
    pub raw_value: RawValue,
    pub declared_at_layer: Layer,
}

impl RawRelationshipDeclaration {
    pub fn new(
        source_id: impl Into<String>,
        pattern: EncodingPattern,
        predicate_raw: impl Into<String>,
        raw_value: impl Into<RawValue>,
        declared_at_layer: Layer,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            pattern,
            predicate_raw: predicate_raw.into(),
            raw_value: raw_value.into(),
            declared_at_layer,
        }
    }
}

/// Declared multiplicity of a relationship, seen from the source entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    #[serde(rename = "1:1")]
    OneToOne,
    #[serde(rename = "1:N")]
    OneToMany,
    #[serde(rename = "N:1")]
    ManyToOne,
    #[serde(rename = "N:N")]
    ManyToMany,
}

impl Cardinality {
    /// Minimum and maximum number of targets a single reference may hold.
    ///
    /// `N:N` has no lower bound of its own; whether zero targets are legal
    /// depends on the rule being optional.
    pub fn bounds(&self) -> (usize, Option<usize>) {
        match self {
            Self::OneToOne | Self::ManyToOne => (1, Some(1)),
            Self::OneToMany => (1, None),
            Self::ManyToMany => (0, None),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneToOne => "1:1",
            Self::OneToMany => "1:N",
            Self::ManyToOne => "N:1",
            Self::ManyToMany => "N:N",
        }
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Cardinality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "1:1" => Ok(Self::OneToOne),
            "1:N" => Ok(Self::OneToMany),
            "N:1" => Ok(Self::ManyToOne),
            "N:N" | "M:N" => Ok(Self::ManyToMany),
            _ => Err(format!("Unknown cardinality: {}", s)),
        }
    }
}

/// How strongly a reference binds its source to its targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    High,
    Medium,
}

/// Layer direction a rule allows its references to point in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllowedDirection {
    /// Target layer must be the same as or more strategic than the source layer
    UpwardOnly,
    /// Source and target must live in the same layer
    IntraLayer,
    /// Any direction
    Bidirectional,
}

/// Relationship category from the structural, behavioral and cross-layer catalogs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    Composition,
    Aggregation,
    /// Ownership declared from the part's side (`part-of`)
    PartOf,
    Assignment,
    Realization,
    Specialization,
    Triggering,
    Flow,
    Serving,
    Access,
    Association,
    /// Cross-layer "references upward" rule
    Reference,
}

impl RelationshipKind {
    /// Ownership-style edges take part in cycle detection
    pub fn is_ownership(&self) -> bool {
        matches!(self, Self::Composition | Self::Aggregation | Self::PartOf)
    }

    /// Structural relationships bind strongly, the rest medium
    pub fn strength(&self) -> Strength {
        match self {
            Self::Composition
            | Self::Aggregation
            | Self::PartOf
            | Self::Assignment
            | Self::Realization
            | Self::Specialization => Strength::High,
            _ => Strength::Medium,
        }
    }
}

/// Pattern-independent form of a relationship declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalReference {
    pub source_id: String,
    pub source_type: String,
    pub source_layer: Layer,
    /// Canonical kebab-case predicate (or the native field name)
    pub predicate: String,
    /// Predicate as written, kept for naming-convention checks
    pub raw_predicate: String,
    pub pattern: EncodingPattern,
    pub declared_at_layer: Layer,
    pub target_layer: Layer,
    pub target_type: String,
    pub target_ids: Vec<String>,
    pub cardinality_declared: Cardinality,
    pub strength: Strength,
    pub required: bool,
}
