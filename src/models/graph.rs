//! Resolved, layer-agnostic reference graph

use super::reference::RelationshipKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One resolved edge: the target exists and has a compatible type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEdge {
    pub source_id: String,
    pub predicate: String,
    pub inverse_predicate: String,
    pub target_id: String,
    pub kind: RelationshipKind,
}

/// Graph of every resolved reference in the model
///
/// Edges keep the order in which they were validated. Outgoing and incoming
/// lookups return edges in that order as well.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidatedGraph {
    edges: Vec<ResolvedEdge>,
    #[serde(skip)]
    outgoing: BTreeMap<String, Vec<usize>>,
    #[serde(skip)]
    incoming: BTreeMap<String, Vec<usize>>,
}

impl ValidatedGraph {
    /// Build a graph from resolved edges
    pub fn from_edges(edges: Vec<ResolvedEdge>) -> Self {
        let mut outgoing: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut incoming: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (idx, edge) in edges.iter().enumerate() {
            outgoing.entry(edge.source_id.clone()).or_default().push(idx);
            incoming.entry(edge.target_id.clone()).or_default().push(idx);
        }
        Self {
            edges,
            outgoing,
            incoming,
        }
    }

    /// All edges
    pub fn edges(&self) -> &[ResolvedEdge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges leaving an entity
    pub fn outgoing<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a ResolvedEdge> + 'a {
        self.outgoing
            .get(id)
            .into_iter()
            .flatten()
            .map(|&idx| &self.edges[idx])
    }

    /// Edges arriving at an entity; read them through `inverse_predicate`
    pub fn incoming<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a ResolvedEdge> + 'a {
        self.incoming
            .get(id)
            .into_iter()
            .flatten()
            .map(|&idx| &self.edges[idx])
    }

    /// Targets reached from `id` through `predicate`
    pub fn targets<'a>(&'a self, id: &str, predicate: &'a str) -> Vec<&'a str> {
        self.outgoing(id)
            .filter(|e| e.predicate == predicate)
            .map(|e| e.target_id.as_str())
            .collect()
    }
}
