//! Entity model and the per-layer document shape handed to the validator

use super::layer::Layer;
use super::reference::RawRelationshipDeclaration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A uniquely identified, typed node belonging to exactly one layer
///
/// # Example
///
/// ```rust
/// use arch_model_sdk::models::{Entity, Layer};
///
/// let service = Entity::new("svc-1", Layer::Business, "BusinessService")
///     .with_attribute("name", "Customer Onboarding")
///     .with_property("owner", "Retail Banking");
/// assert_eq!(service.entity_type, "BusinessService");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Identifier, unique across the whole model (not only its layer)
    pub id: String,
    /// Layer the entity was declared in
    pub layer: Layer,
    /// Entity type, e.g. `BusinessProcess`
    #[serde(rename = "type")]
    pub entity_type: String,
    /// Structured attribute values
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, serde_json::Value>,
    /// Raw string properties as written in the source document
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty", alias = "raw_properties")]
    pub raw_properties: BTreeMap<String, String>,
}

impl Entity {
    /// Create a new entity without attributes
    pub fn new(id: impl Into<String>, layer: Layer, entity_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            layer,
            entity_type: entity_type.into(),
            attributes: BTreeMap::new(),
            raw_properties: BTreeMap::new(),
        }
    }

    /// Add an attribute value
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Add a raw string property
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.raw_properties.insert(name.into(), value.into());
        self
    }

    /// Display name, falling back to the id
    pub fn display_name(&self) -> &str {
        self.attributes
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or(&self.id)
    }
}

/// Everything one layer document contributed to the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayerDocument {
    /// Layer this document describes
    pub layer: Layer,
    /// Entities declared by the document
    #[serde(default)]
    pub entities: Vec<Entity>,
    /// Relationship declarations, still in their source encoding
    #[serde(default)]
    pub declarations: Vec<RawRelationshipDeclaration>,
}

impl LayerDocument {
    /// Create an empty document for a layer
    pub fn new(layer: Layer) -> Self {
        Self {
            layer,
            entities: Vec::new(),
            declarations: Vec::new(),
        }
    }

    /// Add an entity
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    /// Add a raw declaration
    pub fn with_declaration(mut self, declaration: RawRelationshipDeclaration) -> Self {
        self.declarations.push(declaration);
        self
    }
}

/// A complete, already-parsed model: one document per loaded layer file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArchitectureModel {
    pub documents: Vec<LayerDocument>,
}

impl ArchitectureModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer document
    pub fn with_document(mut self, document: LayerDocument) -> Self {
        self.documents.push(document);
        self
    }

    /// Total number of entities across all documents
    pub fn entity_count(&self) -> usize {
        self.documents.iter().map(|d| d.entities.len()).sum()
    }

    /// Total number of raw declarations across all documents
    pub fn declaration_count(&self) -> usize {
        self.documents.iter().map(|d| d.declarations.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_builder() {
        let entity = Entity::new("goal-1", Layer::Motivation, "Goal")
            .with_attribute("name", "Grow revenue")
            .with_property("priority", "high");

        assert_eq!(entity.display_name(), "Grow revenue");
        assert_eq!(entity.raw_properties.get("priority").unwrap(), "high");
    }

    #[test]
    fn test_entity_yaml_roundtrip_uses_type_key() {
        let entity = Entity::new("node-1", Layer::Technology, "Node");
        let yaml = serde_yaml::to_string(&entity).unwrap();
        assert!(yaml.contains("type: Node"));
        let parsed: Entity = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, entity);
    }

    #[test]
    fn test_model_counts() {
        let model = ArchitectureModel::new()
            .with_document(
                LayerDocument::new(Layer::Motivation)
                    .with_entity(Entity::new("goal-1", Layer::Motivation, "Goal"))
                    .with_entity(Entity::new("goal-2", Layer::Motivation, "Goal")),
            )
            .with_document(LayerDocument::new(Layer::Business));
        assert_eq!(model.entity_count(), 2);
        assert_eq!(model.declaration_count(), 0);
    }
}
