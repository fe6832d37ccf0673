//! Specialization hierarchy
//!
//! Accepted `specializes` edges between entities induce a subtype relation
//! between their types: if a `Device` entity specializes a `Node` entity,
//! then `Device` is compatible wherever `Node` is expected. Cyclic
//! specialization chains are reported and left out of the hierarchy.

use super::report::{IssueCode, ValidationIssue};
use crate::model::EntityRegistry;
use crate::models::ResolvedEdge;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Transitive type-compatibility closure
#[derive(Debug, Clone, Default)]
pub struct TypeHierarchy {
    supertypes: BTreeMap<String, BTreeSet<String>>,
}

impl TypeHierarchy {
    /// Hierarchy where every type is only compatible with itself
    pub fn exact() -> Self {
        Self::default()
    }

    /// Build the closure from specialization edges.
    ///
    /// Edges inside an entity-level cycle yield one `CIRCULAR_SPECIALIZATION`
    /// issue per cycle and do not contribute to the closure.
    pub fn build(
        edges: &[ResolvedEdge],
        registry: &EntityRegistry,
    ) -> (Self, Vec<ValidationIssue>) {
        let mut graph = DiGraph::<&str, usize>::new();
        let mut node_map: HashMap<&str, NodeIndex> = HashMap::new();
        for (idx, edge) in edges.iter().enumerate() {
            let source = *node_map
                .entry(edge.source_id.as_str())
                .or_insert_with(|| graph.add_node(edge.source_id.as_str()));
            let target = *node_map
                .entry(edge.target_id.as_str())
                .or_insert_with(|| graph.add_node(edge.target_id.as_str()));
            graph.add_edge(source, target, idx);
        }

        let mut issues = Vec::new();
        // node -> index of the cyclic component it belongs to
        let mut cyclic: HashMap<NodeIndex, usize> = HashMap::new();
        for (scc, component) in tarjan_scc(&graph).into_iter().enumerate() {
            let is_cycle = component.len() > 1
                || graph.find_edge(component[0], component[0]).is_some();
            if !is_cycle {
                continue;
            }
            let mut members: Vec<&str> = component.iter().map(|&n| graph[n]).collect();
            members.sort_unstable();
            let mut issue = ValidationIssue::new(
                IssueCode::CircularSpecialization,
                members[0],
                format!("Specialization cycle among {}", members.join(", ")),
            )
            .with_related(members.iter().copied());
            if let Some(edge) = edges.iter().find(|e| members.contains(&e.source_id.as_str())) {
                issue = issue.with_predicate(&edge.predicate);
            }
            issues.push(issue);
            cyclic.extend(component.into_iter().map(|n| (n, scc)));
        }

        let mut direct: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for edge in edges {
            let source_scc = cyclic.get(&node_map[edge.source_id.as_str()]);
            let target_scc = cyclic.get(&node_map[edge.target_id.as_str()]);
            let in_cycle = source_scc.is_some() && source_scc == target_scc;
            if in_cycle {
                continue;
            }
            let (Some(sub), Some(sup)) = (
                registry.lookup(&edge.source_id),
                registry.lookup(&edge.target_id),
            ) else {
                continue;
            };
            if sub.entity_type != sup.entity_type {
                direct
                    .entry(sub.entity_type.as_str())
                    .or_default()
                    .insert(sup.entity_type.as_str());
            }
        }

        let mut supertypes = BTreeMap::new();
        for &start in direct.keys() {
            let mut reached = BTreeSet::new();
            let mut stack: Vec<&str> = vec![start];
            while let Some(ty) = stack.pop() {
                for &sup in direct.get(ty).into_iter().flatten() {
                    if sup != start && reached.insert(sup.to_string()) {
                        stack.push(sup);
                    }
                }
            }
            supertypes.insert(start.to_string(), reached);
        }

        (Self { supertypes }, issues)
    }

    /// Whether an entity of type `actual` may stand where `expected` is required
    pub fn is_compatible(&self, actual: &str, expected: &str) -> bool {
        actual == expected
            || self
                .supertypes
                .get(actual)
                .is_some_and(|sups| sups.contains(expected))
    }

    /// Transitive supertypes of a type
    pub fn supertypes_of(&self, entity_type: &str) -> impl Iterator<Item = &str> {
        self.supertypes
            .get(entity_type)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Entity, Layer, RelationshipKind};

    fn specializes(source: &str, target: &str) -> ResolvedEdge {
        ResolvedEdge {
            source_id: source.to_string(),
            predicate: "specializes".to_string(),
            inverse_predicate: "specialized-by".to_string(),
            target_id: target.to_string(),
            kind: RelationshipKind::Specialization,
        }
    }

    fn registry(entities: &[(&str, &str)]) -> EntityRegistry {
        let mut registry = EntityRegistry::new();
        for (id, ty) in entities {
            registry
                .register(Entity::new(*id, Layer::Technology, *ty))
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_closure_from_entity_edges() {
        let registry = registry(&[("dev-1", "Device"), ("node-1", "Node")]);
        let (hierarchy, issues) =
            TypeHierarchy::build(&[specializes("dev-1", "node-1")], &registry);

        assert!(issues.is_empty());
        assert!(hierarchy.is_compatible("Device", "Node"));
        assert!(hierarchy.is_compatible("Node", "Node"));
        assert!(!hierarchy.is_compatible("Node", "Device"));
        assert_eq!(hierarchy.supertypes_of("Device").collect::<Vec<_>>(), vec!["Node"]);
    }

    #[test]
    fn test_transitive_closure() {
        let registry = registry(&[("a", "Gateway"), ("b", "Device"), ("c", "Node")]);
        let (hierarchy, _) = TypeHierarchy::build(
            &[specializes("a", "b"), specializes("b", "c")],
            &registry,
        );
        assert!(hierarchy.is_compatible("Gateway", "Node"));
    }

    #[test]
    fn test_cycle_is_reported_and_excluded() {
        let registry = registry(&[("n-1", "Node"), ("d-1", "Device")]);
        let (hierarchy, issues) = TypeHierarchy::build(
            &[specializes("n-1", "d-1"), specializes("d-1", "n-1")],
            &registry,
        );

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::CircularSpecialization);
        assert_eq!(issues[0].source_id, "d-1");
        assert_eq!(issues[0].related_ids, vec!["d-1", "n-1"]);
        assert!(!hierarchy.is_compatible("Device", "Node"));
    }

    #[test]
    fn test_edge_between_cycles_is_kept() {
        let registry = registry(&[
            ("g-1", "Gateway"),
            ("g-2", "Gateway"),
            ("n-1", "Node"),
            ("n-2", "Node"),
        ]);
        let (hierarchy, issues) = TypeHierarchy::build(
            &[
                specializes("g-1", "g-2"),
                specializes("g-2", "g-1"),
                specializes("n-1", "n-2"),
                specializes("n-2", "n-1"),
                specializes("g-1", "n-1"),
            ],
            &registry,
        );

        assert_eq!(issues.len(), 2);
        assert!(hierarchy.is_compatible("Gateway", "Node"));
    }

    #[test]
    fn test_self_specialization_is_a_cycle() {
        let registry = registry(&[("n-1", "Node")]);
        let (_, issues) = TypeHierarchy::build(&[specializes("n-1", "n-1")], &registry);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].related_ids, vec!["n-1"]);
    }
}
