//! Model loading functionality
//!
//! Parses YAML or JSON layer documents into an [`ArchitectureModel`].
//!
//! A file holds either one layer:
//!
//! ```yaml
//! layer: business
//! entities:
//!   - id: svc-1
//!     type: BusinessService
//!     name: Customer Onboarding
//!     motivation.supports-goals: "goal-1,goal-2"
//!     x-governed-by-principles: [principle-1]
//!     motivation:
//!       supportsGoals: [goal-3]
//! ```
//!
//! or several under a `layers:` list. Within an entity, `id`, `type`,
//! `attributes` and `properties` are reserved. Every other key is classified
//! once with [`EncodingPattern::detect`]; keys that do not declare a
//! reference become attributes.

use crate::catalog::RuleCatalog;
use crate::models::{
    ArchitectureModel, EncodingPattern, Entity, Layer, LayerDocument, RawRelationshipDeclaration,
    RawValue,
};
use serde_yaml::{Mapping, Value};
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const RESERVED_KEYS: [&str; 4] = ["id", "type", "attributes", "properties"];

/// Errors raised while loading layer documents
#[derive(Error, Debug)]
pub enum ModelLoadError {
    /// The document is not valid YAML or JSON
    #[error("Failed to parse {document}: {message}")]
    Parse { document: String, message: String },

    /// The document parsed but does not have the expected shape
    #[error("Invalid document {document}: {message}")]
    Structure { document: String, message: String },

    /// IO error with path context
    #[error("IO error with {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ModelLoadError {
    fn structure(document: &str, message: impl Into<String>) -> Self {
        Self::Structure {
            document: document.to_string(),
            message: message.into(),
        }
    }

    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            ModelLoadError::Parse { document, message } => format!(
                "Failed to parse {document}: {message}\n\nHint: Layer documents must be valid YAML or JSON."
            ),
            ModelLoadError::Structure { document, message } => format!(
                "Invalid document {document}: {message}\n\nHint: A document needs `layer` and `entities`, or a `layers` list; every entity needs `id` and `type`."
            ),
            ModelLoadError::Io { path, source } => format!(
                "Cannot read {}: {source}\n\nHint: Check that the file exists and the path is correct.",
                path.display()
            ),
        }
    }
}

/// Loads layer documents, classifying reference fields with the catalog
pub struct ModelLoader<'a> {
    catalog: &'a RuleCatalog,
}

impl<'a> ModelLoader<'a> {
    /// Create a new model loader
    pub fn new(catalog: &'a RuleCatalog) -> Self {
        Self { catalog }
    }

    /// Load and merge several files into one model
    pub fn load_files<P: AsRef<Path>>(
        &self,
        paths: &[P],
    ) -> Result<ArchitectureModel, ModelLoadError> {
        let mut model = ArchitectureModel::new();
        for path in paths {
            model.documents.extend(self.load_file(path.as_ref())?);
        }
        info!(
            "Loaded {} layer documents with {} entities from {} files",
            model.documents.len(),
            model.entity_count(),
            paths.len()
        );
        Ok(model)
    }

    /// Load the layer documents of one file
    pub fn load_file(&self, path: &Path) -> Result<Vec<LayerDocument>, ModelLoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_str(&content, &path.display().to_string())
    }

    /// Load the layer documents of a reader (e.g. stdin)
    pub fn load_reader<R: Read>(
        &self,
        mut reader: R,
        document: &str,
    ) -> Result<Vec<LayerDocument>, ModelLoadError> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|source| ModelLoadError::Io {
                path: PathBuf::from(document),
                source,
            })?;
        self.load_str(&content, document)
    }

    /// Parse a YAML or JSON string; `document` names it in errors
    pub fn load_str(
        &self,
        content: &str,
        document: &str,
    ) -> Result<Vec<LayerDocument>, ModelLoadError> {
        let root = parse_value(content, document)?;
        let Value::Mapping(root) = root else {
            return Err(ModelLoadError::structure(document, "top level must be a mapping"));
        };

        if let Some(layers) = root.get("layers") {
            let Value::Sequence(layers) = layers else {
                return Err(ModelLoadError::structure(document, "`layers` must be a list"));
            };
            layers
                .iter()
                .map(|layer| match layer {
                    Value::Mapping(map) => self.parse_layer(map, document),
                    _ => Err(ModelLoadError::structure(
                        document,
                        "every entry of `layers` must be a mapping",
                    )),
                })
                .collect()
        } else {
            Ok(vec![self.parse_layer(&root, document)?])
        }
    }

    fn parse_layer(&self, map: &Mapping, document: &str) -> Result<LayerDocument, ModelLoadError> {
        let layer_name = map
            .get("layer")
            .and_then(Value::as_str)
            .ok_or_else(|| ModelLoadError::structure(document, "missing `layer`"))?;
        let layer: Layer = layer_name
            .parse()
            .map_err(|e: String| ModelLoadError::structure(document, e))?;

        let mut layer_doc = LayerDocument::new(layer);
        let entities = match map.get("entities") {
            None | Some(Value::Null) => return Ok(layer_doc),
            Some(Value::Sequence(entities)) => entities,
            Some(_) => {
                return Err(ModelLoadError::structure(
                    document,
                    format!("`entities` of layer {} must be a list", layer),
                ));
            }
        };

        for (idx, value) in entities.iter().enumerate() {
            let Value::Mapping(entity_map) = value else {
                return Err(ModelLoadError::structure(
                    document,
                    format!("entity #{} of layer {} is not a mapping", idx + 1, layer),
                ));
            };
            self.parse_entity(entity_map, layer, document, &mut layer_doc)?;
        }
        debug!(
            "Parsed layer {} from {}: {} entities, {} declarations",
            layer,
            document,
            layer_doc.entities.len(),
            layer_doc.declarations.len()
        );
        Ok(layer_doc)
    }

    fn parse_entity(
        &self,
        map: &Mapping,
        layer: Layer,
        document: &str,
        layer_doc: &mut LayerDocument,
    ) -> Result<(), ModelLoadError> {
        let id = map
            .get("id")
            .and_then(scalar_to_string)
            .ok_or_else(|| {
                ModelLoadError::structure(
                    document,
                    format!("entity in layer {} has no `id`", layer),
                )
            })?;
        let entity_type = map.get("type").and_then(Value::as_str).ok_or_else(|| {
            ModelLoadError::structure(document, format!("entity '{}' has no `type`", id))
        })?;

        let mut entity = Entity::new(&id, layer, entity_type);

        if let Some(attributes) = map.get("attributes") {
            let Value::Mapping(attributes) = attributes else {
                return Err(ModelLoadError::structure(
                    document,
                    format!("`attributes` of '{}' must be a mapping", id),
                ));
            };
            for (key, value) in attributes {
                let key = key_name(key, document)?;
                entity.attributes.insert(key.to_string(), to_json(value, document)?);
            }
        }

        if let Some(properties) = map.get("properties") {
            let Value::Mapping(properties) = properties else {
                return Err(ModelLoadError::structure(
                    document,
                    format!("`properties` of '{}' must be a mapping", id),
                ));
            };
            for (key, value) in properties {
                let key = key_name(key, document)?;
                let value = scalar_to_string(value).ok_or_else(|| {
                    ModelLoadError::structure(
                        document,
                        format!("property '{}' of '{}' must be a scalar", key, id),
                    )
                })?;
                entity.raw_properties.insert(key.to_string(), value);
            }
        }

        for (key, value) in map {
            let field = key_name(key, document)?;
            if RESERVED_KEYS.contains(&field) {
                continue;
            }

            let is_native = self.catalog.is_native_field(entity_type, field);
            match EncodingPattern::detect(field, 1, is_native) {
                Some(pattern) => {
                    let raw_value = raw_value(value).ok_or_else(|| {
                        ModelLoadError::structure(
                            document,
                            format!("'{}' of '{}' must be a string or a list of ids", field, id),
                        )
                    })?;
                    layer_doc.declarations.push(RawRelationshipDeclaration::new(
                        &id, pattern, field, raw_value, layer,
                    ));
                }
                // A nested declaration block (depth two)
                None => match as_relationship_group(field, value) {
                    Some(group) => {
                        for (inner, raw_value) in group {
                            let raw = format!("{}.{}", field, inner);
                            layer_doc.declarations.push(RawRelationshipDeclaration::new(
                                &id,
                                EncodingPattern::Nested,
                                raw,
                                raw_value,
                                layer,
                            ));
                        }
                    }
                    None => {
                        entity
                            .attributes
                            .insert(field.to_string(), to_json(value, document)?);
                    }
                },
            }
        }

        layer_doc.entities.push(entity);
        Ok(())
    }
}

fn parse_value(content: &str, document: &str) -> Result<Value, ModelLoadError> {
    let trimmed = content.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        let json: serde_json::Value =
            serde_json::from_str(content).map_err(|e| ModelLoadError::Parse {
                document: document.to_string(),
                message: e.to_string(),
            })?;
        serde_yaml::to_value(json).map_err(|e| ModelLoadError::Parse {
            document: document.to_string(),
            message: e.to_string(),
        })
    } else {
        serde_yaml::from_str(content).map_err(|e| ModelLoadError::Parse {
            document: document.to_string(),
            message: e.to_string(),
        })
    }
}

fn key_name<'v>(key: &'v Value, document: &str) -> Result<&'v str, ModelLoadError> {
    key.as_str()
        .ok_or_else(|| ModelLoadError::structure(document, format!("non-string key {:?}", key)))
}

fn to_json(value: &Value, document: &str) -> Result<serde_json::Value, ModelLoadError> {
    serde_json::to_value(value).map_err(|e| ModelLoadError::structure(document, e.to_string()))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn raw_value(value: &Value) -> Option<RawValue> {
    match value {
        Value::Null => Some(RawValue::List(Vec::new())),
        Value::Sequence(items) => items
            .iter()
            .map(scalar_to_string)
            .collect::<Option<Vec<_>>>()
            .map(RawValue::List),
        other => scalar_to_string(other).map(RawValue::Single),
    }
}

/// A mapping read as a block of nested declarations.
///
/// A group named after a layer accepts scalar values too, so that the
/// normalizer can report them; any other group must hold only id lists.
fn as_relationship_group<'v>(
    group: &str,
    value: &'v Value,
) -> Option<Vec<(&'v str, RawValue)>> {
    let Value::Mapping(map) = value else {
        return None;
    };
    if map.is_empty() {
        return None;
    }
    let layer_group = Layer::from_prefix(group).is_some();
    map.iter()
        .map(|(key, value)| {
            let key = key.as_str()?;
            match value {
                Value::Sequence(_) => Some((key, raw_value(value)?)),
                _ if layer_group => Some((key, raw_value(value)?)),
                _ => None,
            }
        })
        .collect()
}
