//! Layout failures and data quality warnings.

use serde::Serialize;
use stamm_core::graph::{DanglingReference, PersonId};
use std::fmt;

/// Errors that abort a layout run. No partial layout is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// Generation levels did not settle within the pass cap.
    #[error("cyclic ancestry involving '{person}': {}", .cycle.join(" -> "))]
    CyclicAncestry {
        /// One person on the cycle.
        person: PersonId,
        /// The cycle, each id followed by one of its recorded parents,
        /// ending with the first id again.
        cycle: Vec<PersonId>,
    },
}

/// Data quality issues found during a run. Collected, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum LayoutWarning {
    /// A parent, spouse, or relation entry that names no known person.
    DanglingReference(DanglingReference),
    /// A person recorded as their own spouse. Placed and drawn as a single.
    SelfSpouse { person: PersonId },
}

impl fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutWarning::DanglingReference(dangling) => dangling.fmt(f),
            LayoutWarning::SelfSpouse { person } => {
                write!(f, "'{person}' is recorded as their own spouse")
            }
        }
    }
}
