//! Read-side verification of an ingestion run.

use gin_client::{EntityHit, SearchQuery};

use crate::store::EntityStore;

/// Result of a verification probe. Failures are informational only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Found {
        major_kind: String,
        hits: Vec<EntityHit>,
    },
    Failed {
        major_kind: String,
        reason: String,
    },
}

impl Verification {
    /// Number of matching entities; zero when the probe failed.
    pub fn count(&self) -> usize {
        match self {
            Self::Found { hits, .. } => hits.len(),
            Self::Failed { .. } => 0,
        }
    }

    pub fn ids(&self) -> Vec<&str> {
        match self {
            Self::Found { hits, .. } => hits.iter().map(|h| h.id.as_str()).collect(),
            Self::Failed { .. } => Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Search the read API for entities of `major_kind` and report what matched.
pub async fn verify_ingestion<S: EntityStore + ?Sized>(
    store: &S,
    major_kind: &str,
) -> Verification {
    tracing::info!(major_kind, "Verifying ingestion");

    match store.search(&SearchQuery::by_major_kind(major_kind)).await {
        Ok(hits) => {
            tracing::info!(major_kind, count = hits.len(), "Found matching entities");
            for hit in &hits {
                tracing::info!(
                    entity_id = %hit.id,
                    minor_kind = hit.minor_kind().unwrap_or_default(),
                    "Verified entity"
                );
            }
            Verification::Found {
                major_kind: major_kind.to_string(),
                hits,
            }
        }
        Err(e) => {
            tracing::warn!(major_kind, error = %e, "Verification failed");
            Verification::Failed {
                major_kind: major_kind.to_string(),
                reason: e.to_string(),
            }
        }
    }
}
