//! The `relationships.json` document: person id → `{"parents": [...], "spouse": id|null}`.

use crate::graph::{PersonId, Relation};
use anyhow::{Context, Result};
use std::collections::BTreeMap;

/// File name of the relationship document at the archive root.
pub const RELATIONSHIPS_FILE: &str = "relationships.json";

/// Parsed relationship document, keyed and iterated in id order.
pub type Relations = BTreeMap<PersonId, Relation>;

/// Serialize relations to a pretty-printed JSON string.
pub fn to_json(relations: &Relations) -> Result<String> {
    serde_json::to_string_pretty(relations).context("failed to serialize relationships to JSON")
}

/// Deserialize relations from a JSON string. Absent keys take their defaults.
pub fn from_json(json: &str) -> Result<Relations> {
    serde_json::from_str(json).context("failed to deserialize relationships from JSON")
}
