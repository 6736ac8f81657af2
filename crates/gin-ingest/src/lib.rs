//! gin-ingest: Tabular-to-graph loader for OpenGIN.
//!
//! Reads entity, relationship and attribute tables from a directory, shapes
//! each entity into a write payload, and loads them in two phases: create
//! every entity without edges, then link the entities that have outgoing
//! relationships. A read-side probe verifies the result.

pub mod clock;
pub mod config;
pub mod encode;
pub mod error;
pub mod orchestrator;
pub mod payload;
pub mod source;
pub mod store;
pub mod verify;
