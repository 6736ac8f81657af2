//! Read operations against the read API.

use serde::{Deserialize, Serialize};

use gin_core::Kind;

use crate::client::{ClientError, GinClient};

/// A structured search by major kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchQuery {
    pub kind: KindFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KindFilter {
    pub major: String,
}

impl SearchQuery {
    pub fn by_major_kind(major: impl Into<String>) -> Self {
        Self {
            kind: KindFilter {
                major: major.into(),
            },
        }
    }
}

/// A lightweight record returned from search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct EntityHit {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub kind: Option<Kind>,
}

impl EntityHit {
    pub fn minor_kind(&self) -> Option<&str> {
        self.kind.as_ref().map(|k| k.minor.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    body: Vec<serde_json::Value>,
}

impl GinClient {
    /// Search entities: `POST <read>/search`. Only HTTP 200 is accepted.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<EntityHit>, ClientError> {
        let response = self
            .http()
            .post(self.search_url())
            .json(query)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        if status != 200 {
            return Err(ClientError::Status { status, body });
        }

        parse_search_body(&body)
    }
}

/// Decode the `body` array of a search response.
///
/// Entries that do not look like entity records are kept with an empty id
/// rather than failing the whole search.
pub fn parse_search_body(raw: &str) -> Result<Vec<EntityHit>, ClientError> {
    let response: SearchResponse = serde_json::from_str(raw)?;
    Ok(response
        .body
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap_or_default())
        .collect())
}
