//! Parent and spouse edges between placed persons.

use crate::rows::{Position, Positions};
use serde::Serialize;
use stamm_core::graph::{PersonId, RelationshipGraph};

/// A line between two placed persons, in unscaled `(level, slot)` space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from_id: PersonId,
    pub to_id: PersonId,
    pub from: Position,
    pub to: Position,
}

/// Output of [`project_edges`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Edges {
    /// Parent → child, children in id order, parents in recorded order.
    pub parent_edges: Vec<Edge>,
    /// Declaring person → spouse.
    pub spouse_edges: Vec<Edge>,
}

fn edge(from_id: &PersonId, to_id: &PersonId, positions: &Positions) -> Option<Edge> {
    let from = *positions.get(from_id)?;
    let to = *positions.get(to_id)?;
    Some(Edge {
        from_id: from_id.clone(),
        to_id: to_id.clone(),
        from,
        to,
    })
}

/// Emit every edge whose endpoints both have a position.
///
/// Unplaced endpoints (dangling ids) are skipped. Duplicate parent entries
/// give duplicate edges. A spouse link declared from both sides yields one
/// edge, taken from the side with the smaller id; a one-sided link yields the
/// declared direction. Self-spouse links yield nothing.
pub fn project_edges(graph: &RelationshipGraph, positions: &Positions) -> Edges {
    let mut edges = Edges::default();

    for (child, relation) in graph.relations() {
        for parent in &relation.parents {
            if let Some(e) = edge(parent, child, positions) {
                edges.parent_edges.push(e);
            }
        }
    }

    for (person, relation) in graph.relations() {
        let Some(spouse) = &relation.spouse else {
            continue;
        };
        if spouse == person {
            continue;
        }
        let mutual = graph.spouse_of(spouse) == Some(person);
        if mutual && spouse < person {
            continue;
        }
        if let Some(e) = edge(person, spouse, positions) {
            edges.spouse_edges.push(e);
        }
    }

    edges
}
