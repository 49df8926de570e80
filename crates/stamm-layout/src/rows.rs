//! Row packing: slots within each generation, spouses side by side.

use crate::levels::Levels;
use serde::Serialize;
use stamm_core::graph::{PersonId, RelationshipGraph};
use std::collections::{BTreeMap, HashSet};

/// Place of a person in the diagram. `slot` is unique within its level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub level: usize,
    pub slot: usize,
}

impl Position {
    pub fn new(level: usize, slot: usize) -> Self {
        Self { level, slot }
    }
}

/// Position per known person.
pub type Positions = BTreeMap<PersonId, Position>;

/// Packing unit within a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Single(PersonId),
    /// The declaring person first, then the spouse.
    Pair(PersonId, PersonId),
}

impl Cell {
    /// Number of slots the cell occupies.
    pub fn width(&self) -> usize {
        match self {
            Cell::Single(_) => 1,
            Cell::Pair(..) => 2,
        }
    }

    pub fn members(&self) -> Vec<&PersonId> {
        match self {
            Cell::Single(a) => vec![a],
            Cell::Pair(a, b) => vec![a, b],
        }
    }
}

/// All persons sharing one level, as left-to-right cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub level: usize,
    pub cells: Vec<Cell>,
}

impl Row {
    /// Number of slots used by the row.
    pub fn width(&self) -> usize {
        self.cells.iter().map(Cell::width).sum()
    }
}

/// Output of [`pack_rows`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packing {
    /// Rows in ascending level order.
    pub rows: Vec<Row>,
    pub positions: Positions,
}

/// Order each generation into cells and assign consecutive slots.
///
/// Spouses declared from both sides are paired first, so a one-sided claim
/// never splits a married couple. The remaining persons are then visited in
/// id order: a person whose declared spouse sits in the same row and is not
/// yet placed forms a pair with them. The spouse does not need to declare the
/// person back, so inconsistent input still pairs. Cells are ordered by their
/// first member's id.
pub fn pack_rows(graph: &RelationshipGraph, levels: &Levels) -> Packing {
    let mut by_level: BTreeMap<usize, Vec<&PersonId>> = BTreeMap::new();
    for (person, &level) in levels {
        by_level.entry(level).or_default().push(person);
    }

    let mut packing = Packing::default();
    for (level, persons) in by_level {
        let mut placed: HashSet<&str> = HashSet::new();
        let mut cells = Vec::new();

        // Available partner of `person` in this row, if any
        let partner = |person: &PersonId, placed: &HashSet<&str>| {
            graph.spouse_of(person).filter(|spouse| {
                *spouse != person
                    && levels.get(spouse.as_str()) == Some(&level)
                    && !placed.contains(spouse.as_str())
            })
        };

        for &person in &persons {
            if placed.contains(person.as_str()) {
                continue;
            }
            if let Some(spouse) = partner(person, &placed)
                && graph.spouse_of(spouse) == Some(person)
            {
                placed.insert(person);
                placed.insert(spouse);
                cells.push(Cell::Pair(person.clone(), spouse.clone()));
            }
        }

        for &person in &persons {
            if placed.contains(person.as_str()) {
                continue;
            }
            let cell = match partner(person, &placed) {
                Some(spouse) => {
                    placed.insert(spouse);
                    Cell::Pair(person.clone(), spouse.clone())
                }
                None => Cell::Single(person.clone()),
            };
            placed.insert(person);
            cells.push(cell);
        }

        // The first member of every cell is its smallest id
        cells.sort_by(|a, b| a.members()[0].cmp(b.members()[0]));

        let mut slot = 0;
        for member in cells.iter().flat_map(Cell::members) {
            packing
                .positions
                .insert(member.clone(), Position::new(level, slot));
            slot += 1;
        }
        tracing::debug!("level {}: {} cells, {} slots", level, cells.len(), slot);
        packing.rows.push(Row { level, cells });
    }

    packing
}
