//! Models module for the SDK
//!
//! Defines the layered architecture model as seen by the validator: layers,
//! entities, raw and canonical relationship declarations, and the resolved
//! reference graph.

pub mod entity;
pub mod graph;
pub mod layer;
pub mod reference;

pub use entity::{ArchitectureModel, Entity, LayerDocument};
pub use graph::{ResolvedEdge, ValidatedGraph};
pub use layer::Layer;
pub use reference::{
    AllowedDirection, CanonicalReference, Cardinality, EncodingPattern, RawRelationshipDeclaration,
    RawValue, RelationshipKind, Strength,
};
