//! Entity payload construction.
//!
//! A payload is rebuilt from the source tables for every phase an entity
//! takes part in; nothing is patched between phases.

use gin_core::{EntityPayload, EntityRecord, MetadataEntry, RelationshipEntry, RelationshipRecord};

use crate::clock::Clock;
use crate::encode::encode_attribute;
use crate::source::{AttributeTable, MetadataMap, SourceTables};

/// Which optional parts a payload carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    pub include_relationships: bool,
    pub include_kind: bool,
}

impl BuildOptions {
    /// Phase 1: kind, no edges.
    pub const CREATE: Self = Self {
        include_relationships: false,
        include_kind: true,
    };

    /// Phase 2: edges, no kind (the store treats kind as immutable).
    pub const LINK: Self = Self {
        include_relationships: true,
        include_kind: false,
    };
}

/// Builds write payloads against one run's source tables.
pub struct PayloadBuilder<'a> {
    relationships: &'a [RelationshipRecord],
    attributes: &'a [AttributeTable],
    metadata: &'a MetadataMap,
    clock: &'a dyn Clock,
}

impl<'a> PayloadBuilder<'a> {
    pub fn new(
        relationships: &'a [RelationshipRecord],
        attributes: &'a [AttributeTable],
        metadata: &'a MetadataMap,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            relationships,
            attributes,
            metadata,
            clock,
        }
    }

    pub fn for_sources(sources: &'a SourceTables, clock: &'a dyn Clock) -> Self {
        Self::new(
            &sources.relationships,
            &sources.attributes,
            &sources.metadata,
            clock,
        )
    }

    pub fn build(&self, entity: &EntityRecord, options: BuildOptions) -> EntityPayload {
        let mut payload = EntityPayload::base(entity);

        if options.include_kind {
            payload.kind = Some(entity.kind.clone());
        }

        payload.metadata = self.metadata_for(entity);

        for source in self.attributes {
            let rows = source.rows_for(&entity.id);
            if let Some(attr) = encode_attribute(&source.key, &rows, &source.columns, self.clock) {
                payload.attributes.push(attr);
            }
        }

        if options.include_relationships {
            payload.relationships = Some(self.relationships_for(entity));
        }

        payload
    }

    fn metadata_for(&self, entity: &EntityRecord) -> Vec<MetadataEntry> {
        match self.metadata.get(entity.id.as_str()) {
            Some(serde_json::Value::Object(fields)) => fields
                .iter()
                .map(|(key, value)| MetadataEntry {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
            Some(other) => {
                tracing::warn!(
                    entity_id = %entity.id,
                    value = %other,
                    "Metadata entry is not an object, ignoring it"
                );
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    fn relationships_for(&self, entity: &EntityRecord) -> Vec<RelationshipEntry> {
        self.relationships
            .iter()
            .filter(|rel| rel.from_id == entity.id)
            .map(RelationshipEntry::from)
            .collect()
    }
}
