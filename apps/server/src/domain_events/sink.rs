use goalsaver_core::events::{DomainEvent, DomainEventSink};

/// Writes every domain event to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDomainEventSink;

impl DomainEventSink for TracingDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        match &event {
            DomainEvent::GoalsChanged { goal_ids } => {
                tracing::info!(goals = ?goal_ids, "Goals changed");
            }
            DomainEvent::SeedApplied {
                sentinel_user_id,
                fixture_version,
                documents,
            } => {
                tracing::info!(
                    user = %sentinel_user_id,
                    fixture_version,
                    documents,
                    "Seed fixture applied"
                );
            }
        }
    }
}
