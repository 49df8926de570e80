//! Layout engine for stamm family trees.
//!
//! A run is a pure function of one [`RelationshipGraph`]:
//!
//! 1. [`levels::assign_levels`] puts every known person on a generation level,
//! 2. [`rows::pack_rows`] orders each level into cells and slots, spouses side by side,
//! 3. [`edges::project_edges`] emits parent and spouse edges between positions.
//!
//! [`layout`] runs all three and collects data quality warnings. [`scene`] and
//! [`export`] turn the result into pixel geometry and SVG.
//!
//! # Example
//!
//! ```
//! use stamm_core::graph::{Relation, RelationshipGraph};
//! use stamm_layout::layout;
//!
//! let graph = RelationshipGraph::new(
//!     ["mum".to_string(), "kid".to_string()],
//!     [("kid".to_string(), Relation::new(vec!["mum".to_string()], None))],
//! );
//! let result = layout(&graph).unwrap();
//! assert_eq!(result.levels["kid"], 1);
//! assert_eq!(result.edges.parent_edges.len(), 1);
//! ```

pub mod edges;
mod error;
pub mod export;
pub mod levels;
pub mod rows;
pub mod scene;

pub use edges::{Edge, Edges};
pub use error::{LayoutError, LayoutWarning};
pub use levels::Levels;
pub use rows::{Cell, Position, Positions, Row};
pub use scene::Scene;

use serde::Serialize;
use stamm_core::graph::RelationshipGraph;

/// Everything one layout run produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub levels: Levels,
    /// Rows in ascending level order.
    pub rows: Vec<Row>,
    pub positions: Positions,
    #[serde(flatten)]
    pub edges: Edges,
    pub warnings: Vec<LayoutWarning>,
}

impl Layout {
    /// Number of generations.
    pub fn generations(&self) -> usize {
        self.rows.len()
    }

    pub fn position(&self, id: &str) -> Option<Position> {
        self.positions.get(id).copied()
    }
}

/// Run the full pipeline on `graph`.
///
/// A cyclic ancestry aborts the run. Dangling references and self-spouse
/// links are returned in [`Layout::warnings`].
pub fn layout(graph: &RelationshipGraph) -> Result<Layout, LayoutError> {
    let warnings = collect_warnings(graph);
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }
    let levels = levels::assign_levels(graph)?;
    let packing = rows::pack_rows(graph, &levels);
    let edges = edges::project_edges(graph, &packing.positions);

    tracing::debug!(
        "laid out {} persons in {} rows, {} parent edges, {} spouse edges",
        packing.positions.len(),
        packing.rows.len(),
        edges.parent_edges.len(),
        edges.spouse_edges.len()
    );

    Ok(Layout {
        levels,
        rows: packing.rows,
        positions: packing.positions,
        edges,
        warnings,
    })
}

/// Data quality warnings for `graph`: dangling references in relation order,
/// then self-spouse links in id order.
pub fn collect_warnings(graph: &RelationshipGraph) -> Vec<LayoutWarning> {
    let mut warnings: Vec<LayoutWarning> = graph
        .dangling_references()
        .into_iter()
        .map(LayoutWarning::DanglingReference)
        .collect();
    for person in graph.persons() {
        if graph.spouse_of(person) == Some(person) {
            warnings.push(LayoutWarning::SelfSpouse {
                person: person.clone(),
            });
        }
    }
    warnings
}
