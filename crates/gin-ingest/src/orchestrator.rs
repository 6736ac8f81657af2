//! Two-phase ingestion.
//!
//! The store rejects a relationship whose target does not exist yet, and the
//! source tables give no ordering guarantee between an entity and the
//! entities it references. So every entity is created first without edges
//! (phase 1), and only then are edges attached with an update to each entity
//! that has outgoing relationships (phase 2).
//!
//! Both phases are best-effort: each entity's write is attempted once, its
//! outcome recorded, and the loop moves on.

use std::collections::HashSet;
use std::fmt;

use uuid::Uuid;

use gin_client::WriteOutcome;
use gin_core::{EntityId, EntityRecord, RelationshipRecord};

use crate::clock::Clock;
use crate::payload::{BuildOptions, PayloadBuilder};
use crate::source::SourceTables;
use crate::store::EntityStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Create,
    Link,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("create"),
            Self::Link => f.write_str("link"),
        }
    }
}

/// One entity's write attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityWrite {
    pub entity_id: EntityId,
    pub outcome: WriteOutcome,
}

/// All write attempts of a phase, in processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReport {
    pub phase: Phase,
    pub writes: Vec<EntityWrite>,
}

impl PhaseReport {
    fn new(phase: Phase) -> Self {
        Self {
            phase,
            writes: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.count(|o| *o == WriteOutcome::Success)
    }

    pub fn skipped(&self) -> usize {
        self.count(WriteOutcome::is_skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(|o| !o.is_ok())
    }

    /// True when no write hard-failed.
    pub fn all_ok(&self) -> bool {
        self.failed() == 0
    }

    pub fn entity_ids(&self) -> Vec<&EntityId> {
        self.writes.iter().map(|w| &w.entity_id).collect()
    }

    fn count(&self, pred: impl Fn(&WriteOutcome) -> bool) -> usize {
        self.writes.iter().filter(|w| pred(&w.outcome)).count()
    }
}

/// The outcome of a full ingestion run.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub run_id: Uuid,
    pub create: PhaseReport,
    pub link: PhaseReport,
}

impl IngestReport {
    pub fn all_ok(&self) -> bool {
        self.create.all_ok() && self.link.all_ok()
    }
}

/// Entities that appear as a relationship source, in entity load order.
///
/// Sources with no matching entity are reported and left out.
pub fn link_targets<'a>(
    entities: &'a [EntityRecord],
    relationships: &[RelationshipRecord],
) -> Vec<&'a EntityRecord> {
    let sources: HashSet<&EntityId> = relationships.iter().map(|r| &r.from_id).collect();

    let known: HashSet<&EntityId> = entities.iter().map(|e| &e.id).collect();
    for dangling in sources.iter().filter(|id| !known.contains(*id)) {
        tracing::warn!(
            entity_id = %dangling,
            "Relationship source is not a known entity, not linking"
        );
    }

    entities
        .iter()
        .filter(|e| sources.contains(&e.id))
        .collect()
}

/// Runs the create and link phases against a store.
pub struct Ingestor<'a, S: EntityStore> {
    store: &'a S,
    sources: &'a SourceTables,
    builder: PayloadBuilder<'a>,
}

impl<'a, S: EntityStore> Ingestor<'a, S> {
    pub fn new(store: &'a S, sources: &'a SourceTables, clock: &'a dyn Clock) -> Self {
        Self {
            store,
            sources,
            builder: PayloadBuilder::for_sources(sources, clock),
        }
    }

    /// Phase 1 for every entity, then phase 2 for linked entities.
    pub async fn run(&self) -> IngestReport {
        let run_id = Uuid::new_v4();
        tracing::info!(
            run_id = %run_id,
            entities = self.sources.entities.len(),
            "Ingestion started"
        );

        let create = self.create_phase().await;
        let link = self.link_phase().await;

        let report = IngestReport {
            run_id,
            create,
            link,
        };
        tracing::info!(run_id = %run_id, all_ok = report.all_ok(), "Ingestion finished");
        report
    }

    /// Create every entity with its kind and without relationships.
    pub async fn create_phase(&self) -> PhaseReport {
        tracing::info!(phase = %Phase::Create, "Creating entities (without relationships)");
        let mut report = PhaseReport::new(Phase::Create);

        for entity in &self.sources.entities {
            tracing::info!(entity_id = %entity.id, name = %entity.name, "Creating entity");
            let payload = self.builder.build(entity, BuildOptions::CREATE);
            let outcome = self.store.create(&payload).await;
            record(&mut report, entity, outcome);
        }

        log_summary(&report);
        report
    }

    /// Attach relationships to every entity that has outgoing edges.
    pub async fn link_phase(&self) -> PhaseReport {
        tracing::info!(phase = %Phase::Link, "Updating entities (with relationships)");
        let mut report = PhaseReport::new(Phase::Link);

        for entity in link_targets(&self.sources.entities, &self.sources.relationships) {
            tracing::info!(entity_id = %entity.id, "Linking entity");
            let payload = self.builder.build(entity, BuildOptions::LINK);
            let outcome = self.store.update(&entity.id, &payload).await;
            record(&mut report, entity, outcome);
        }

        log_summary(&report);
        report
    }
}

fn record(report: &mut PhaseReport, entity: &EntityRecord, outcome: WriteOutcome) {
    let phase = report.phase;
    match &outcome {
        WriteOutcome::Success => {
            tracing::info!(%phase, entity_id = %entity.id, "Success");
        }
        WriteOutcome::AlreadyExists => {
            tracing::warn!(
                %phase,
                entity_id = %entity.id,
                "Skipping creation (entity already exists)"
            );
        }
        WriteOutcome::ImmutableConflict => {
            tracing::warn!(%phase, entity_id = %entity.id, "Skipping update (already linked)");
        }
        WriteOutcome::Failed { status, detail } => {
            tracing::error!(
                %phase,
                entity_id = %entity.id,
                status = ?status,
                detail = %detail,
                "Write failed"
            );
        }
    }
    report.writes.push(EntityWrite {
        entity_id: entity.id.clone(),
        outcome,
    });
}

fn log_summary(report: &PhaseReport) {
    tracing::info!(
        phase = %report.phase,
        attempted = report.writes.len(),
        succeeded = report.succeeded(),
        skipped = report.skipped(),
        failed = report.failed(),
        "Phase complete"
    );
}

#[cfg(test)]
mod tests {
    use gin_core::Kind;

    use super::*;

    fn entity(id: &str) -> EntityRecord {
        EntityRecord {
            id: EntityId::new(id),
            name: id.to_string(),
            start_time: "2024-01-01".to_string(),
            kind: Kind::default(),
        }
    }

    fn rel(from: &str, to: &str) -> RelationshipRecord {
        RelationshipRecord {
            from_id: EntityId::new(from),
            to_id: EntityId::new(to),
            relation: "knows".to_string(),
            start_time: "2024-01-01".to_string(),
            end_time: None,
        }
    }

    #[test]
    fn link_targets_are_distinct_sources_in_load_order() {
        let entities = vec![entity("C"), entity("A"), entity("B"), entity("D")];
        let rels = vec![rel("A", "B"), rel("C", "A"), rel("A", "D"), rel("Z", "A")];

        let ids: Vec<&str> = link_targets(&entities, &rels)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["C", "A"]);
    }

    #[test]
    fn no_relationships_no_link_targets() {
        let entities = vec![entity("A")];
        assert!(link_targets(&entities, &[]).is_empty());
    }

    #[test]
    fn phase_report_counts() {
        let mut report = PhaseReport::new(Phase::Create);
        let outcomes = [
            WriteOutcome::Success,
            WriteOutcome::AlreadyExists,
            WriteOutcome::ImmutableConflict,
            WriteOutcome::Failed {
                status: Some(500),
                detail: "boom".to_string(),
            },
        ];
        for (i, outcome) in outcomes.into_iter().enumerate() {
            record(&mut report, &entity(&format!("E{i}")), outcome);
        }

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.skipped(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.all_ok());
        assert_eq!(report.entity_ids().len(), 4);
        assert_eq!(Phase::Link.to_string(), "link");
    }
}
