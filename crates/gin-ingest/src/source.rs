//! Tabular source loading.
//!
//! Reads the entity, relationship and attribute tables (CSV with a header
//! row) plus the optional metadata document from a data directory. Entity and
//! relationship tables are mandatory; everything else degrades to empty.
//! No type or referential checks happen here.

use std::fs;
use std::path::Path;

use gin_core::{EntityId, EntityRecord, Kind, RelationshipRecord};

use crate::config::{AttributeTableConfig, IngestConfig};
use crate::error::{IngestError, Result};

/// Entity id → key/value object, in document order.
pub type MetadataMap = serde_json::Map<String, serde_json::Value>;

const ENTITY_COLUMNS: [&str; 5] = ["id", "name", "start_time", "kind_major", "kind_minor"];
const RELATIONSHIP_COLUMNS: [&str; 4] = ["from_id", "to_id", "relation", "start_time"];
const RELATIONSHIP_END_COLUMN: &str = "end_time";

// ── Table ─────────────────────────────────────────────────────────

/// An in-memory string table: a header plus rows of cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table. Rows shorter than the header are padded with empty cells.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                if row.len() < width {
                    row.resize(width, String::new());
                }
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Read a CSV file whose first record is the header.
    pub fn read_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }
        Ok(Self::new(columns, rows))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Rows whose `column` cell equals `value`, as a new table with the same header.
    pub fn rows_where(&self, column: &str, value: &str) -> Table {
        let Some(idx) = self.column_index(column) else {
            return Table {
                columns: self.columns.clone(),
                rows: Vec::new(),
            };
        };
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| row.get(idx).is_some_and(|cell| cell == value))
                .cloned()
                .collect(),
        }
    }

    /// Project every row onto `columns`, in that order.
    ///
    /// A requested column that the table lacks yields empty cells.
    pub fn project(&self, columns: &[String]) -> Vec<Vec<String>> {
        let indices: Vec<Option<usize>> = columns.iter().map(|c| self.column_index(c)).collect();
        self.rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|idx| idx.and_then(|i| row.get(i)).cloned().unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    fn require_columns(&self, table: &str, names: &[&str]) -> Result<Vec<usize>> {
        names
            .iter()
            .map(|name| {
                self.column_index(name).ok_or_else(|| IngestError::MissingColumn {
                    table: table.to_string(),
                    column: name.to_string(),
                })
            })
            .collect()
    }
}

// ── Attribute Tables ──────────────────────────────────────────────

/// A loaded attribute source together with its registration.
#[derive(Debug, Clone)]
pub struct AttributeTable {
    pub key: String,
    pub foreign_key: String,
    pub columns: Vec<String>,
    pub table: Table,
}

impl AttributeTable {
    pub fn new(registration: &AttributeTableConfig, table: Table) -> Self {
        Self {
            key: registration.key.clone(),
            foreign_key: registration.foreign_key.clone(),
            columns: registration.columns.clone(),
            table,
        }
    }

    /// The rows owned by `entity_id`.
    pub fn rows_for(&self, entity_id: &EntityId) -> Table {
        self.table.rows_where(&self.foreign_key, entity_id.as_str())
    }
}

// ── Source Tables ─────────────────────────────────────────────────

/// Everything one run reads from the data directory.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub entities: Vec<EntityRecord>,
    pub relationships: Vec<RelationshipRecord>,
    pub attributes: Vec<AttributeTable>,
    pub metadata: MetadataMap,
}

impl SourceTables {
    /// Load all inputs from `dir` using the file names in `config`.
    pub fn load(dir: &Path, config: &IngestConfig) -> Result<Self> {
        tracing::info!(data_dir = %dir.display(), "Loading data files");

        let entities = parse_entities(&read_required(dir, "entities", &config.entities_file)?)?;
        let relationships = parse_relationships(&read_required(
            dir,
            "relationships",
            &config.relationships_file,
        )?)?;

        let attributes = config
            .attribute_tables
            .iter()
            .map(|reg| load_attribute_table(dir, reg).map(|t| AttributeTable::new(reg, t)))
            .collect::<Result<Vec<_>>>()?;

        let metadata = load_metadata(&dir.join(&config.metadata_file))?;

        tracing::info!(
            entities = entities.len(),
            relationships = relationships.len(),
            attribute_tables = attributes.len(),
            metadata_entries = metadata.len(),
            "Loaded source tables"
        );

        Ok(Self {
            entities,
            relationships,
            attributes,
            metadata,
        })
    }
}

fn read_required(dir: &Path, table: &str, file: &str) -> Result<Table> {
    let path = dir.join(file);
    if !path.is_file() {
        return Err(IngestError::MissingTable {
            table: table.to_string(),
            path,
        });
    }
    Table::read_csv(&path)
}

/// Load an optional attribute table. A missing file, or a table without the
/// foreign-key column, is an empty table.
fn load_attribute_table(dir: &Path, registration: &AttributeTableConfig) -> Result<Table> {
    let path = dir.join(&registration.file);
    if !path.is_file() {
        tracing::debug!(key = %registration.key, path = %path.display(), "Attribute table absent");
        return Ok(Table::empty());
    }

    let table = Table::read_csv(&path)?;
    if !table.is_empty() && !table.has_column(&registration.foreign_key) {
        tracing::warn!(
            key = %registration.key,
            foreign_key = %registration.foreign_key,
            "Attribute table has no foreign-key column, ignoring it"
        );
        return Ok(Table::empty());
    }
    Ok(table)
}

/// Load the optional metadata document. A missing file is an empty map.
pub fn load_metadata(path: &Path) -> Result<MetadataMap> {
    if !path.is_file() {
        return Ok(MetadataMap::new());
    }
    match serde_json::from_str(&fs::read_to_string(path)?)? {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(IngestError::MetadataShape),
    }
}

/// Parse entity rows. A blank id is logged and carried through; the store
/// rejects that entity alone.
pub fn parse_entities(table: &Table) -> Result<Vec<EntityRecord>> {
    let idx = table.require_columns("entities", &ENTITY_COLUMNS)?;
    let entities: Vec<EntityRecord> = table
        .rows()
        .iter()
        .map(|row| EntityRecord {
            id: EntityId::new(row[idx[0]].clone()),
            name: row[idx[1]].clone(),
            start_time: row[idx[2]].clone(),
            kind: Kind {
                major: row[idx[3]].clone(),
                minor: row[idx[4]].clone(),
            },
        })
        .collect();

    for (row, entity) in entities.iter().enumerate() {
        if entity.id.is_blank() {
            tracing::warn!(table = "entities", row, "Blank entity id");
        }
    }
    Ok(entities)
}

pub fn parse_relationships(table: &Table) -> Result<Vec<RelationshipRecord>> {
    let idx = table.require_columns("relationships", &RELATIONSHIP_COLUMNS)?;
    let end_idx = table.column_index(RELATIONSHIP_END_COLUMN);

    let relationships: Vec<RelationshipRecord> = table
        .rows()
        .iter()
        .map(|row| RelationshipRecord {
            from_id: EntityId::new(row[idx[0]].clone()),
            to_id: EntityId::new(row[idx[1]].clone()),
            relation: row[idx[2]].clone(),
            start_time: row[idx[3]].clone(),
            end_time: end_idx
                .map(|i| row[i].clone())
                .filter(|end| !end.trim().is_empty()),
        })
        .collect();

    for (row, rel) in relationships.iter().enumerate() {
        if rel.from_id.is_blank() || rel.to_id.is_blank() {
            tracing::warn!(
                table = "relationships",
                row,
                from_id = %rel.from_id,
                to_id = %rel.to_id,
                "Blank relationship endpoint"
            );
        }
    }
    Ok(relationships)
}
