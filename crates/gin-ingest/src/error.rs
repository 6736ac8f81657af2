//! Error types for the gin-ingest crate.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Required {table} table not found at {}", path.display())]
    MissingTable { table: String, path: PathBuf },

    #[error("Column {column} missing from {table} table")]
    MissingColumn { table: String, column: String },

    #[error("Metadata document is not a JSON object")]
    MetadataShape,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
