//! Entity registry
//!
//! Holds every entity of a model keyed by its globally unique id, with a
//! secondary index by `(layer, type)`. Entities are stored in registration
//! order so iteration is deterministic.

use crate::models::{Entity, Layer};
use std::collections::HashMap;
use thiserror::Error;

/// An entity id was registered twice
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Duplicate entity id '{id}' in layer {layer} (already registered in layer {existing_layer})")]
pub struct DuplicateIdError {
    pub id: String,
    pub layer: Layer,
    pub existing_layer: Layer,
}

/// Registry of all entities in a model
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    by_id: HashMap<String, usize>,
    by_type: HashMap<(Layer, String), Vec<usize>>,
}

impl EntityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity.
    ///
    /// Ids are global, not per layer: a second entity with the same id is
    /// rejected whatever its layer, and the first registration is kept
    /// unchanged.
    pub fn register(&mut self, entity: Entity) -> Result<(), DuplicateIdError> {
        if let Some(&existing) = self.by_id.get(&entity.id) {
            return Err(DuplicateIdError {
                id: entity.id,
                layer: entity.layer,
                existing_layer: self.entities[existing].layer,
            });
        }

        let idx = self.entities.len();
        self.by_id.insert(entity.id.clone(), idx);
        self.by_type
            .entry((entity.layer, entity.entity_type.clone()))
            .or_default()
            .push(idx);
        self.entities.push(entity);
        Ok(())
    }

    /// Look up an entity by id
    pub fn lookup(&self, id: &str) -> Option<&Entity> {
        self.by_id.get(id).map(|&idx| &self.entities[idx])
    }

    /// Check if an id is registered
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Entities of one type in one layer, in registration order.
    ///
    /// The returned iterator is `Clone`, so callers can restart it.
    pub fn entities_of_type<'a>(
        &'a self,
        layer: Layer,
        entity_type: &str,
    ) -> impl Iterator<Item = &'a Entity> + Clone + 'a {
        self.by_type
            .get(&(layer, entity_type.to_string()))
            .map(|indices| indices.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&idx| &self.entities[idx])
    }

    /// All entities in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + Clone {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = EntityRegistry::new();
        registry
            .register(Entity::new("goal-1", Layer::Motivation, "Goal"))
            .unwrap();

        let goal = registry.lookup("goal-1").unwrap();
        assert_eq!(goal.entity_type, "Goal");
        assert!(registry.lookup("goal-2").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_id_across_layers_keeps_first() {
        let mut registry = EntityRegistry::new();
        registry
            .register(Entity::new("shared", Layer::Motivation, "Goal"))
            .unwrap();

        let err = registry
            .register(Entity::new("shared", Layer::Technology, "Node"))
            .unwrap_err();
        assert_eq!(err.id, "shared");
        assert_eq!(err.layer, Layer::Technology);
        assert_eq!(err.existing_layer, Layer::Motivation);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("shared").unwrap().entity_type, "Goal");
        assert_eq!(registry.entities_of_type(Layer::Technology, "Node").count(), 0);
    }

    #[test]
    fn test_entities_of_type_is_restartable() {
        let mut registry = EntityRegistry::new();
        registry
            .register(Entity::new("n-1", Layer::Technology, "Node"))
            .unwrap();
        registry
            .register(Entity::new("d-1", Layer::Technology, "Device"))
            .unwrap();
        registry
            .register(Entity::new("n-2", Layer::Technology, "Node"))
            .unwrap();

        let nodes = registry.entities_of_type(Layer::Technology, "Node");
        let first: Vec<_> = nodes.clone().map(|e| e.id.as_str()).collect();
        let second: Vec<_> = nodes.map(|e| e.id.as_str()).collect();
        assert_eq!(first, vec!["n-1", "n-2"]);
        assert_eq!(first, second);

        assert_eq!(registry.entities_of_type(Layer::Business, "Node").count(), 0);
    }
}
