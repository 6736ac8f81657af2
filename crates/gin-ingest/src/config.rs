//! Configuration for the gin-ingest loader.

use std::time::Duration;

use serde::Deserialize;

use gin_client::ClientConfig;

/// Top-level loader configuration.
///
/// Loaded from the `gin.toml` `[ingest]` section or `GIN__INGEST__*`
/// environment variables (e.g. `GIN__INGEST__DATA_DIR`).
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Directory holding the source tables.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_entities_file")]
    pub entities_file: String,

    #[serde(default = "default_relationships_file")]
    pub relationships_file: String,

    /// Optional JSON document mapping entity id to a key/value object.
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,

    /// Major kind queried by the verification probe.
    #[serde(default = "default_verify_major_kind")]
    pub verify_major_kind: String,

    /// Optional attribute tables, encoded in this order.
    #[serde(default = "default_attribute_tables")]
    pub attribute_tables: Vec<AttributeTableConfig>,
}

/// Registration of one tabular attribute source.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AttributeTableConfig {
    /// Attribute key on the entity payload.
    pub key: String,

    /// File name under the data directory.
    pub file: String,

    /// Column holding the owning entity's id.
    #[serde(default = "default_foreign_key")]
    pub foreign_key: String,

    /// Columns projected into the attribute table, in order.
    pub columns: Vec<String>,
}

impl AttributeTableConfig {
    pub fn new(key: &str, file: &str, columns: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            file: file.to_string(),
            foreign_key: default_foreign_key(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Endpoints of the OpenGIN store.
///
/// Loaded from the `[opengin]` section or `GIN__OPENGIN__` environment
/// variables.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenGinConfig {
    #[serde(default = "default_ingestion_url")]
    pub ingestion_url: String,

    #[serde(default = "default_read_url")]
    pub read_url: String,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl OpenGinConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            ingestion_url: self.ingestion_url.clone(),
            read_url: self.read_url.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

fn default_data_dir() -> String {
    "tutorials/data".to_string()
}

fn default_entities_file() -> String {
    "entities.csv".to_string()
}

fn default_relationships_file() -> String {
    "relationships.csv".to_string()
}

fn default_metadata_file() -> String {
    "metadata.json".to_string()
}

fn default_verify_major_kind() -> String {
    "Person".to_string()
}

fn default_foreign_key() -> String {
    "RelatedEntityID".to_string()
}

fn default_attribute_tables() -> Vec<AttributeTableConfig> {
    vec![
        AttributeTableConfig::new("expenses", "expenses.csv", &["Month", "Category", "Amount"]),
        AttributeTableConfig::new("income", "income.csv", &["Month", "Source", "Amount"]),
    ]
}

fn default_ingestion_url() -> String {
    ClientConfig::default().ingestion_url
}

fn default_read_url() -> String {
    ClientConfig::default().read_url
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            entities_file: default_entities_file(),
            relationships_file: default_relationships_file(),
            metadata_file: default_metadata_file(),
            verify_major_kind: default_verify_major_kind(),
            attribute_tables: default_attribute_tables(),
        }
    }
}

impl Default for OpenGinConfig {
    fn default() -> Self {
        Self {
            ingestion_url: default_ingestion_url(),
            read_url: default_read_url(),
            timeout_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IngestConfig::default();
        assert_eq!(config.data_dir, "tutorials/data");
        assert_eq!(config.entities_file, "entities.csv");
        assert_eq!(config.verify_major_kind, "Person");
        assert_eq!(config.attribute_tables.len(), 2);
        assert_eq!(config.attribute_tables[0].key, "expenses");
        assert_eq!(
            config.attribute_tables[1].columns,
            vec!["Month", "Source", "Amount"]
        );
        assert_eq!(config.attribute_tables[1].foreign_key, "RelatedEntityID");
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: IngestConfig = serde_json::from_value(serde_json::json!({
            "data_dir": "/srv/data",
            "attribute_tables": [
                {"key": "assets", "file": "assets.csv", "columns": ["Year", "Value"]}
            ]
        }))
        .unwrap();
        assert_eq!(config.data_dir, "/srv/data");
        assert_eq!(config.relationships_file, "relationships.csv");
        assert_eq!(config.attribute_tables.len(), 1);
        assert_eq!(config.attribute_tables[0].foreign_key, "RelatedEntityID");
    }

    #[test]
    fn test_client_config_conversion() {
        let opengin = OpenGinConfig {
            timeout_secs: Some(30),
            ..Default::default()
        };
        let client = opengin.client_config();
        assert_eq!(client.ingestion_url, "http://localhost:8080/entities");
        assert_eq!(client.read_url, "http://localhost:8081/v1/entities");
        assert_eq!(client.timeout, Some(Duration::from_secs(30)));
    }
}
