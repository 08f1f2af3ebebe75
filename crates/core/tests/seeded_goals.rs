use std::sync::Arc;

use goalsaver_core::constants::SEED_SENTINEL_USER_ID;
use goalsaver_core::documents::{DocumentStoreTrait, InMemoryDocumentStore};
use goalsaver_core::events::{DomainEvent, MockDomainEventSink};
use goalsaver_core::goals::{GoalService, GoalServiceTrait};
use goalsaver_core::seed::{SeedOutcome, SeedService};
use goalsaver_core::Amount;
use rust_decimal_macros::dec;

#[tokio::test]
async fn edits_survive_a_second_bootstrap() {
    let store: Arc<dyn DocumentStoreTrait> = Arc::new(InMemoryDocumentStore::new());
    let sink = MockDomainEventSink::new();
    let seed = SeedService::new(store.clone(), Arc::new(sink.clone()));
    let goals = GoalService::new(store.clone(), Arc::new(sink.clone()));

    assert!(matches!(seed.initialize().await.unwrap(), SeedOutcome::Applied(_)));

    let mut trip = goals
        .get_goals_for_user(SEED_SENTINEL_USER_ID)
        .unwrap()
        .into_iter()
        .find(|g| g.name == "Trip to NYC")
        .unwrap();
    trip.target_amount = Amount::new(dec!(1200)).unwrap();
    trip.icon = Some("🗽".to_string());
    goals.update_goal(&trip.id.clone(), trip.clone()).await.unwrap();

    assert_eq!(seed.initialize().await.unwrap(), SeedOutcome::AlreadySeeded);
    let stored = goals.get_goal(&trip.id).unwrap();
    assert_eq!(stored.target_amount.value(), dec!(1200));
    assert_eq!(stored.icon.as_deref(), Some("🗽"));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(
        &events[0],
        DomainEvent::SeedApplied { documents: 25, .. }
    ));
    assert_eq!(events[1], DomainEvent::goals_changed(vec![trip.id]));
}
