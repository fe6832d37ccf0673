//! Ownership cycle detection
//!
//! Composition and aggregation edges point from owner to part; `part-of`
//! edges are turned around so that they do too. An entity must never own
//! itself, directly or transitively.

use super::report::{IssueCode, ValidationIssue};
use crate::models::{RelationshipKind, ResolvedEdge};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// Finds cycles in the ownership subgraph
#[derive(Debug, Default)]
pub struct CycleDetector;

impl CycleDetector {
    pub fn new() -> Self {
        Self
    }

    /// Report every ownership cycle.
    ///
    /// Nodes are visited in the order they first appear in `edges` and the
    /// successors of a node in edge order, so the result is stable across
    /// runs. Each back edge found by the traversal yields one issue.
    pub fn detect(&self, edges: &[ResolvedEdge]) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let mut graph = DiGraph::<&str, &str>::new();
        let mut node_map: HashMap<&str, NodeIndex> = HashMap::new();

        for edge in edges.iter().filter(|e| e.kind.is_ownership()) {
            let (owner, part) = if edge.kind == RelationshipKind::PartOf {
                (edge.target_id.as_str(), edge.source_id.as_str())
            } else {
                (edge.source_id.as_str(), edge.target_id.as_str())
            };

            if owner == part {
                issues.push(
                    ValidationIssue::new(
                        IssueCode::CircularComposition,
                        owner,
                        format!("{} -> {}", owner, owner),
                    )
                    .with_predicate(edge.predicate.as_str())
                    .with_related([owner]),
                );
                continue;
            }

            let owner_idx = *node_map
                .entry(owner)
                .or_insert_with(|| graph.add_node(owner));
            let part_idx = *node_map
                .entry(part)
                .or_insert_with(|| graph.add_node(part));
            if graph.find_edge(owner_idx, part_idx).is_none() {
                graph.add_edge(owner_idx, part_idx, edge.predicate.as_str());
            }
        }

        let mut marks = vec![Mark::Unvisited; graph.node_count()];
        for start in graph.node_indices() {
            if marks[start.index()] == Mark::Unvisited {
                self.visit(&graph, start, &mut marks, &mut issues);
            }
        }

        if !issues.is_empty() {
            tracing::warn!("Found {} ownership cycle(s)", issues.len());
        }
        issues
    }

    /// Iterative depth-first traversal from `start`
    fn visit(
        &self,
        graph: &DiGraph<&str, &str>,
        start: NodeIndex,
        marks: &mut [Mark],
        issues: &mut Vec<ValidationIssue>,
    ) {
        // petgraph lists edges newest first; restore insertion order
        let successors = |node: NodeIndex| {
            let mut out: Vec<_> = graph
                .edges(node)
                .map(|e| (e.id(), e.target(), *e.weight()))
                .collect();
            out.sort_by_key(|(id, _, _)| *id);
            out
        };

        let mut path: Vec<NodeIndex> = vec![start];
        let mut stack = vec![(successors(start), 0usize)];
        marks[start.index()] = Mark::OnStack;

        while let Some((next, pos)) = stack.last_mut() {
            let Some(&(_, child, predicate)) = next.get(*pos) else {
                if let Some(done) = path.pop() {
                    marks[done.index()] = Mark::Done;
                }
                stack.pop();
                continue;
            };
            *pos += 1;

            match marks[child.index()] {
                Mark::Unvisited => {
                    marks[child.index()] = Mark::OnStack;
                    path.push(child);
                    stack.push((successors(child), 0));
                }
                Mark::OnStack => {
                    let from = path.iter().position(|&n| n == child).unwrap_or(0);
                    let cycle: Vec<&str> = path[from..].iter().map(|&n| graph[n]).collect();
                    let rendered = cycle
                        .iter()
                        .chain(std::iter::once(&graph[child]))
                        .copied()
                        .collect::<Vec<_>>()
                        .join(" -> ");
                    issues.push(
                        ValidationIssue::new(IssueCode::CircularComposition, graph[child], rendered)
                            .with_predicate(predicate)
                            .with_related(cycle),
                    );
                }
                Mark::Done => {}
            }
        }
    }
}
