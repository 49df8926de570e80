//! Core types and storage for stamm family trees.
//!
//! Provides the relationship graph ([`graph::RelationshipGraph`]), person
//! records ([`profile::Profile`]), the `relationships.json` document, `.stamm`
//! archive I/O, and configuration.

pub mod archive;
pub mod config;
pub mod graph;
pub mod profile;
pub mod schema;
