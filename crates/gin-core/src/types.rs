//! Core domain types for the OpenGIN loader.
//!
//! Records (`EntityRecord`, `RelationshipRecord`) are what the source tables
//! yield. Everything else in this module is the JSON shape the ingestion API
//! accepts, serialized field-for-field with serde.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ── Identifiers ───────────────────────────────────────────────────

/// Identifier of an entity, unique within a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Wrap a raw identifier. The value is carried verbatim; the store is the
    /// authority on what it accepts.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// True for an empty or whitespace-only identifier.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Synthesize the identifier of a relationship instance from its endpoints.
///
/// The result is lower-cased and depends only on `(source, target)`, so the
/// same edge always maps to the same id across runs and retries.
pub fn relationship_id(source: &EntityId, target: &EntityId) -> String {
    format!("rel-{source}-to-{target}").to_lowercase()
}

// ── Source Records ────────────────────────────────────────────────

/// Two-level kind classification of an entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct Kind {
    pub major: String,
    pub minor: String,
}

/// An entity row from the entity table. Never mutated after loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    pub id: EntityId,
    pub name: String,
    /// Creation timestamp, passed through verbatim from the source.
    pub start_time: String,
    pub kind: Kind,
}

/// A directed, time-bounded edge from the relationship table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipRecord {
    pub from_id: EntityId,
    pub to_id: EntityId,
    pub relation: String,
    pub start_time: String,
    /// `None` means the relationship is still open.
    pub end_time: Option<String>,
}

impl RelationshipRecord {
    pub fn relationship_id(&self) -> String {
        relationship_id(&self.from_id, &self.to_id)
    }
}

// ── Time-Versioned Values ─────────────────────────────────────────

/// A single `{startTime, endTime?, value}` entry of a value's history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeBasedValue<T> {
    #[serde(rename = "startTime")]
    pub valid_from: String,
    #[serde(rename = "endTime", default, skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<String>,
    pub value: T,
}

impl<T> TimeBasedValue<T> {
    /// An open-ended entry effective from `valid_from`.
    pub fn open(valid_from: impl Into<String>, value: T) -> Self {
        Self {
            valid_from: valid_from.into(),
            valid_to: None,
            value,
        }
    }
}

/// The time-versioned envelope: the ordered history of a value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Versioned<T> {
    pub values: Vec<TimeBasedValue<T>>,
}

impl<T> Versioned<T> {
    /// A one-entry history.
    pub fn single(entry: TimeBasedValue<T>) -> Self {
        Self {
            values: vec![entry],
        }
    }
}

// ── Payload Types ─────────────────────────────────────────────────

/// A table-valued attribute body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TabularValue {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A named attribute carrying a time-versioned table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attribute {
    pub key: String,
    pub value: Versioned<TabularValue>,
}

/// Opaque key/value metadata attached to an entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetadataEntry {
    pub key: String,
    pub value: serde_json::Value,
}

/// The body of a relationship entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelationshipValue {
    #[serde(rename = "relatedEntityId")]
    pub related_entity_id: String,
    #[serde(rename = "startTime")]
    pub valid_from: String,
    /// Always emitted; the empty string means open-ended.
    #[serde(rename = "endTime")]
    pub valid_to: String,
    pub id: String,
    pub name: String,
}

/// A relationship keyed by its relation name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelationshipEntry {
    pub key: String,
    pub value: RelationshipValue,
}

impl From<&RelationshipRecord> for RelationshipEntry {
    fn from(rel: &RelationshipRecord) -> Self {
        Self {
            key: rel.relation.clone(),
            value: RelationshipValue {
                related_entity_id: rel.to_id.to_string(),
                valid_from: rel.start_time.clone(),
                valid_to: rel.end_time.clone().unwrap_or_default(),
                id: rel.relationship_id(),
                name: rel.relation.clone(),
            },
        }
    }
}

/// A complete entity write payload.
///
/// `kind` and `relationships` are omitted from the JSON when `None`: the
/// create call carries a kind but no edges, the link call carries edges but
/// no kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityPayload {
    pub id: String,
    pub created: String,
    pub name: TimeBasedValue<String>,
    pub metadata: Vec<MetadataEntry>,
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Vec<RelationshipEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Kind>,
}

impl EntityPayload {
    /// Base payload: identity, creation time and name, with empty collections.
    pub fn base(entity: &EntityRecord) -> Self {
        Self {
            id: entity.id.to_string(),
            created: entity.start_time.clone(),
            name: TimeBasedValue::open(entity.start_time.clone(), entity.name.clone()),
            metadata: Vec::new(),
            attributes: Vec::new(),
            relationships: None,
            kind: None,
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value, CoreError> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> EntityId {
        EntityId::new(raw)
    }

    fn person(raw: &str) -> EntityRecord {
        EntityRecord {
            id: id(raw),
            name: format!("Name of {raw}"),
            start_time: "2024-01-01T00:00:00Z".to_string(),
            kind: Kind {
                major: "Person".to_string(),
                minor: "Citizen".to_string(),
            },
        }
    }

    #[test]
    fn blank_identifier_is_carried_verbatim() {
        assert!(id("").is_blank());
        assert!(id("   ").is_blank());
        assert_eq!(id("   ").as_str(), "   ");
        assert!(!id("P1").is_blank());
        assert_eq!(id("P1").as_str(), "P1");
    }

    #[test]
    fn relationship_id_is_lowercase_and_stable() {
        let a = id("Person-A");
        let b = id("Org-B");
        let first = relationship_id(&a, &b);
        assert_eq!(first, "rel-person-a-to-org-b");
        assert_eq!(first, relationship_id(&a, &b));
        assert_ne!(first, relationship_id(&b, &a));
    }

    #[test]
    fn base_payload_omits_kind_and_relationships() {
        let json = EntityPayload::base(&person("A")).to_json().unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("kind"));
        assert!(!obj.contains_key("relationships"));
        assert_eq!(json["metadata"], serde_json::json!([]));
        assert_eq!(json["attributes"], serde_json::json!([]));
        assert_eq!(json["created"], "2024-01-01T00:00:00Z");
        assert_eq!(
            json["name"],
            serde_json::json!({"startTime": "2024-01-01T00:00:00Z", "value": "Name of A"})
        );
    }

    #[test]
    fn relationship_entry_wire_shape() {
        let rel = RelationshipRecord {
            from_id: id("A"),
            to_id: id("B"),
            relation: "knows".to_string(),
            start_time: "2024-01-01".to_string(),
            end_time: None,
        };
        let json = serde_json::to_value(RelationshipEntry::from(&rel)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "key": "knows",
                "value": {
                    "relatedEntityId": "B",
                    "startTime": "2024-01-01",
                    "endTime": "",
                    "id": "rel-a-to-b",
                    "name": "knows"
                }
            })
        );
    }

    #[test]
    fn relationship_entry_keeps_closed_end_time() {
        let rel = RelationshipRecord {
            from_id: id("A"),
            to_id: id("B"),
            relation: "worked_at".to_string(),
            start_time: "2020-01-01".to_string(),
            end_time: Some("2022-06-30".to_string()),
        };
        assert_eq!(RelationshipEntry::from(&rel).value.valid_to, "2022-06-30");
    }

    #[test]
    fn versioned_envelope_serializes_values_array() {
        let table = TabularValue {
            columns: vec!["Month".to_string()],
            rows: vec![vec!["Jan".to_string()]],
        };
        let env = Versioned::single(TimeBasedValue::open("2024-05-01T10:00:00.000000Z", table));
        let json = serde_json::to_value(&env).unwrap();
        let entry = &json["values"][0];
        assert_eq!(json["values"].as_array().unwrap().len(), 1);
        assert_eq!(entry["startTime"], "2024-05-01T10:00:00.000000Z");
        assert!(entry.get("endTime").is_none());
        assert_eq!(entry["value"]["columns"], serde_json::json!(["Month"]));
        assert_eq!(entry["value"]["rows"], serde_json::json!([["Jan"]]));
    }
}
