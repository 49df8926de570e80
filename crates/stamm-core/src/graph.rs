//! Relationship graph data model: known persons, parent edges, spouse links.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Stable identifier of a person. In archives this is the profile file name.
pub type PersonId = String;

/// Recorded relationships of one person, exactly as the input declares them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Relation {
    /// Parents in recorded order. Not deduplicated.
    pub parents: Vec<PersonId>,
    /// Declared spouse. The reverse link may be absent.
    pub spouse: Option<PersonId>,
}

impl Relation {
    pub fn new(parents: Vec<PersonId>, spouse: Option<PersonId>) -> Self {
        Self { parents, spouse }
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty() && self.spouse.is_none()
    }
}

/// Which kind of reference failed to resolve to a known person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// A `parents` entry.
    Parent,
    /// A `spouse` value.
    Spouse,
    /// The relation entry itself is keyed by an unknown id.
    Entry,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReferenceKind::Parent => "parent",
            ReferenceKind::Spouse => "spouse",
            ReferenceKind::Entry => "relation entry",
        };
        f.write_str(label)
    }
}

/// A reference to a person id that is not among the known persons.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DanglingReference {
    /// The person whose relation entry holds the reference.
    pub person: PersonId,
    /// The unresolved id.
    pub reference: PersonId,
    pub kind: ReferenceKind,
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ReferenceKind::Entry => write!(f, "relation entry for unknown person '{}'", self.person),
            kind => write!(
                f,
                "{} of '{}' references unknown person '{}'",
                kind, self.person, self.reference
            ),
        }
    }
}

/// Immutable input of one layout run.
///
/// Construction records the data as given. Ids referenced as parents or
/// spouses that are not in `persons` are kept and filtered by consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipGraph {
    persons: BTreeSet<PersonId>,
    relations: BTreeMap<PersonId, Relation>,
}

impl RelationshipGraph {
    pub fn new<P, R>(persons: P, relations: R) -> Self
    where
        P: IntoIterator<Item = PersonId>,
        R: IntoIterator<Item = (PersonId, Relation)>,
    {
        Self {
            persons: persons.into_iter().collect(),
            relations: relations.into_iter().collect(),
        }
    }

    /// Known persons in sorted order.
    pub fn persons(&self) -> impl Iterator<Item = &PersonId> {
        self.persons.iter()
    }

    /// All relation entries, including ones keyed by unknown ids.
    pub fn relations(&self) -> &BTreeMap<PersonId, Relation> {
        &self.relations
    }

    pub fn contains(&self, id: &str) -> bool {
        self.persons.contains(id)
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// Recorded parents of `id`; empty when no relation entry exists.
    pub fn parents_of(&self, id: &str) -> &[PersonId] {
        self.relations
            .get(id)
            .map_or(&[][..], |rel| rel.parents.as_slice())
    }

    /// Parents of `id` that are known persons, in recorded order.
    pub fn known_parents_of<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a PersonId> + 'a {
        self.parents_of(id)
            .iter()
            .filter(|parent| self.persons.contains(parent.as_str()))
    }

    pub fn spouse_of(&self, id: &str) -> Option<&PersonId> {
        self.relations.get(id).and_then(|rel| rel.spouse.as_ref())
    }

    /// Number of recorded parent entries across all relations.
    pub fn parent_edge_count(&self) -> usize {
        self.relations.values().map(|rel| rel.parents.len()).sum()
    }

    /// Every reference that does not resolve to a known person.
    ///
    /// Ordered by the owning person, then parents (recorded order) before spouse.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();
        for (person, relation) in &self.relations {
            if !self.persons.contains(person) {
                dangling.push(DanglingReference {
                    person: person.clone(),
                    reference: person.clone(),
                    kind: ReferenceKind::Entry,
                });
                continue;
            }
            for parent in &relation.parents {
                if !self.persons.contains(parent) {
                    dangling.push(DanglingReference {
                        person: person.clone(),
                        reference: parent.clone(),
                        kind: ReferenceKind::Parent,
                    });
                }
            }
            if let Some(spouse) = &relation.spouse
                && !self.persons.contains(spouse)
            {
                dangling.push(DanglingReference {
                    person: person.clone(),
                    reference: spouse.clone(),
                    kind: ReferenceKind::Spouse,
                });
            }
        }
        dangling
    }
}
