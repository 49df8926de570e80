//! Generation levels from parent edges.
//!
//! Every known person starts at level 0. Each pass raises a person to one
//! below their deepest known parent. Passes repeat until nothing changes.
//! Levels only ever rise, so for acyclic input the fixed point is unique and
//! independent of iteration order. The number of passes is bounded by the
//! longest ancestry chain plus one. A cycle would keep raising levels forever,
//! so passes are capped at `|persons| + 1` and exceeding the cap is reported
//! as [`LayoutError::CyclicAncestry`].
//!
//! Cost is `O(passes × parent edges)`.

use crate::error::LayoutError;
use stamm_core::graph::{PersonId, RelationshipGraph};
use std::collections::{BTreeMap, HashMap};

/// Generation level per known person. 0 means no known ancestor.
pub type Levels = BTreeMap<PersonId, usize>;

/// Compute the level of every known person.
pub fn assign_levels(graph: &RelationshipGraph) -> Result<Levels, LayoutError> {
    let mut levels: Levels = graph.persons().map(|p| (p.clone(), 0)).collect();
    let max_passes = graph.len() + 1;
    let mut last_raised = None;

    for pass in 1..=max_passes {
        let mut changed = false;

        for (person, relation) in graph.relations() {
            // Entries for unknown persons take no part in the layout
            let Some(&current) = levels.get(person) else {
                continue;
            };
            let mut level = current;
            for parent in &relation.parents {
                if let Some(&parent_level) = levels.get(parent)
                    && level <= parent_level
                {
                    level = parent_level + 1;
                }
            }
            if level != current {
                levels.insert(person.clone(), level);
                last_raised = Some(person);
                changed = true;
            }
        }

        if !changed {
            tracing::debug!("levels settled after {} pass(es)", pass);
            return Ok(levels);
        }
    }

    let cycle = find_cycle(graph).unwrap_or_else(|| {
        // Unreachable for a correct graph walk; name the last raised person.
        last_raised.into_iter().cloned().collect()
    });
    let person = cycle.first().cloned().unwrap_or_default();
    tracing::warn!("no fixed point after {} passes, cycle at '{}'", max_passes, person);
    Err(LayoutError::CyclicAncestry { person, cycle })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnPath,
    Done,
}

/// Find one cycle among known parent edges, walking persons in id order.
///
/// Returns the path `[p0, p1, ..., p0]` where each id is followed by one of
/// its recorded parents.
pub fn find_cycle(graph: &RelationshipGraph) -> Option<Vec<PersonId>> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();

    for start in graph.persons() {
        if marks.contains_key(start.as_str()) {
            continue;
        }
        marks.insert(start.as_str(), Mark::OnPath);
        // (person, index of the next parent to visit)
        let mut stack: Vec<(&str, usize)> = vec![(start.as_str(), 0)];

        while let Some(frame) = stack.last_mut() {
            let (person, next) = *frame;
            let parents = graph.parents_of(person);

            if next >= parents.len() {
                marks.insert(person, Mark::Done);
                stack.pop();
                continue;
            }
            frame.1 += 1;

            let parent = parents[next].as_str();
            if !graph.contains(parent) {
                continue;
            }
            match marks.get(parent) {
                Some(Mark::OnPath) => {
                    let begin = stack.iter().position(|(p, _)| *p == parent).unwrap_or(0);
                    let mut cycle: Vec<PersonId> =
                        stack[begin..].iter().map(|(p, _)| p.to_string()).collect();
                    cycle.push(parent.to_string());
                    return Some(cycle);
                }
                Some(Mark::Done) => {}
                None => {
                    marks.insert(parent, Mark::OnPath);
                    stack.push((parent, 0));
                }
            }
        }
    }

    None
}
