//! Write operations against the ingestion API.
//!
//! Creates are insert-only and updates are upserts by identifier. The store
//! rejects a duplicate create with an "already exists" body and a kind change
//! with "cannot update immutable fields"; both are tolerated so a run can be
//! repeated against a populated store.

use gin_core::EntityPayload;

use crate::client::GinClient;

const ALREADY_EXISTS: &str = "already exists";
const IMMUTABLE_FIELDS: &str = "cannot update immutable fields";

/// Result of a single entity write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// HTTP 200 or 201.
    Success,
    /// Create rejected because the entity is already present.
    AlreadyExists,
    /// Update rejected because it touched an immutable field.
    ImmutableConflict,
    /// Any other status, or a transport error (`status` is `None`).
    Failed { status: Option<u16>, detail: String },
}

impl WriteOutcome {
    /// Classify a completed HTTP exchange.
    pub fn from_response(status: u16, body: &str) -> Self {
        if matches!(status, 200 | 201) {
            Self::Success
        } else if body.contains(ALREADY_EXISTS) {
            Self::AlreadyExists
        } else if body.contains(IMMUTABLE_FIELDS) {
            Self::ImmutableConflict
        } else {
            Self::Failed {
                status: Some(status),
                detail: body.to_string(),
            }
        }
    }

    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Failed {
            status: None,
            detail: err.to_string(),
        }
    }

    /// True for success and for both tolerated rejections.
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// True for the tolerated rejections only.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::AlreadyExists | Self::ImmutableConflict)
    }
}

impl GinClient {
    /// Create an entity: `POST <ingestion>`.
    pub async fn create_entity(&self, payload: &EntityPayload) -> WriteOutcome {
        let request = self.http().post(self.create_url()).json(payload);
        send(request).await
    }

    /// Update an entity in place: `PUT <ingestion>/<id>`.
    pub async fn update_entity(&self, entity_id: &str, payload: &EntityPayload) -> WriteOutcome {
        let request = self.http().put(self.entity_url(entity_id)).json(payload);
        send(request).await
    }
}

async fn send(request: reqwest::RequestBuilder) -> WriteOutcome {
    let response = match request.send().await {
        Ok(r) => r,
        Err(e) => return WriteOutcome::transport(e),
    };

    let status = response.status().as_u16();
    match response.text().await {
        Ok(body) => WriteOutcome::from_response(status, &body),
        Err(e) if matches!(status, 200 | 201) => {
            tracing::debug!(status, error = %e, "Discarding unreadable success body");
            WriteOutcome::Success
        }
        Err(e) => WriteOutcome::Failed {
            status: Some(status),
            detail: e.to_string(),
        },
    }
}
