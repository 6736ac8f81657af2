//! gin-core: Shared data model for the OpenGIN tabular loader.
//!
//! This crate provides the types every other loader component agrees on:
//! - Entity and relationship records read from the source tables
//! - The time-versioned value envelope used by names, attributes and edges
//! - The entity write payload sent to the ingestion API
//! - Common error types

pub mod error;
pub mod types;

pub use error::CoreError;
pub use types::{
    relationship_id, Attribute, EntityId, EntityPayload, EntityRecord, Kind, MetadataEntry,
    RelationshipEntry, RelationshipRecord, RelationshipValue, TabularValue, TimeBasedValue,
    Versioned,
};
