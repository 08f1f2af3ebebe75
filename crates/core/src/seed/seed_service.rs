use std::sync::Arc;

use log::{info, warn};

use super::fixture::{SeedFixture, SeedSummary};
use crate::constants::SEED_SENTINEL_USER_ID;
use crate::documents::{Collection, DocumentStoreTrait};
use crate::errors::Result;
use crate::events::{DomainEvent, DomainEventSink};

/// What a bootstrap run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The sentinel user was found; nothing was touched.
    AlreadySeeded,
    /// All five collections were dropped and replaced by the fixture.
    Applied(SeedSummary),
}

/// Loads the demo data set on first boot.
///
/// Destructive when the sentinel user is missing: every collection is cleared
/// before the fixture is inserted. Only enable it for development or demo
/// databases.
pub struct SeedService {
    store: Arc<dyn DocumentStoreTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    fixture: Option<SeedFixture>,
}

impl SeedService {
    pub fn new(store: Arc<dyn DocumentStoreTrait>, event_sink: Arc<dyn DomainEventSink>) -> Self {
        Self {
            store,
            event_sink,
            fixture: None,
        }
    }

    /// Seeds from `fixture` instead of the embedded one.
    pub fn with_fixture(mut self, fixture: SeedFixture) -> Self {
        self.fixture = Some(fixture);
        self
    }

    pub fn is_seeded(&self) -> Result<bool> {
        Ok(self
            .store
            .find_by_id(Collection::Users, SEED_SENTINEL_USER_ID)?
            .is_some())
    }

    /// Runs the guard, then drop-and-insert as a single store transaction.
    /// Any store failure is returned as is; nothing is retried.
    pub async fn initialize(&self) -> Result<SeedOutcome> {
        if self.is_seeded()? {
            info!("Seed data already present (user {}), skipping bootstrap", SEED_SENTINEL_USER_ID);
            return Ok(SeedOutcome::AlreadySeeded);
        }

        let fixture = match &self.fixture {
            Some(fixture) => fixture.clone(),
            None => SeedFixture::embedded()?,
        };
        fixture.validate()?;
        let summary = fixture.summary();
        let batches = fixture.into_batches()?;

        warn!(
            "Sentinel user {} missing: replacing {} with seed fixture v{}",
            SEED_SENTINEL_USER_ID,
            Collection::ALL.map(|c| c.name()).join(", "),
            summary.fixture_version
        );
        self.store.reset_collections(batches).await?;

        info!("Seeded {} documents", summary.total());
        self.event_sink.emit(DomainEvent::seed_applied(
            SEED_SENTINEL_USER_ID.to_string(),
            summary.fixture_version,
            summary.total(),
        ));
        Ok(SeedOutcome::Applied(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::Account;
    use crate::documents::{
        find_document, list_documents, CollectionBatch, InMemoryDocumentStore, RawDocument,
    };
    use crate::errors::{DatabaseError, Error};
    use crate::events::MockDomainEventSink;
    use crate::goals::Goal;
    use crate::tags::Tag;
    use crate::transactions::Transaction;
    use crate::users::User;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashSet;

    fn service(store: Arc<dyn DocumentStoreTrait>) -> (SeedService, MockDomainEventSink) {
        let sink = MockDomainEventSink::new();
        (SeedService::new(store, Arc::new(sink.clone())), sink)
    }

    fn counts(store: &dyn DocumentStoreTrait) -> Vec<usize> {
        Collection::ALL
            .iter()
            .map(|c| store.count(*c).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let store: Arc<dyn DocumentStoreTrait> = Arc::new(InMemoryDocumentStore::new());
        let (seed, sink) = service(store.clone());

        let first = seed.initialize().await.unwrap();
        assert!(matches!(first, SeedOutcome::Applied(summary) if summary.total() == 25));
        let after_first = counts(store.as_ref());

        let second = seed.initialize().await.unwrap();
        assert_eq!(second, SeedOutcome::AlreadySeeded);
        assert_eq!(counts(store.as_ref()), after_first);
        // Users, Accounts, Goals, Tags, Transactions
        assert_eq!(after_first, vec![1, 1, 4, 5, 14]);
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn seeded_records_reference_each_other() {
        let store: Arc<dyn DocumentStoreTrait> = Arc::new(InMemoryDocumentStore::new());
        let (seed, _) = service(store.clone());
        seed.initialize().await.unwrap();
        let store = store.as_ref();

        let tags: HashSet<String> = list_documents::<Tag>(store)
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        let user = find_document::<User>(store, SEED_SENTINEL_USER_ID)
            .unwrap()
            .unwrap();

        for transaction in list_documents::<Transaction>(store).unwrap() {
            assert_eq!(transaction.user_id, user.id);
            assert!(transaction.tag_ids.iter().all(|id| tags.contains(id)));
        }
        for goal in list_documents::<Goal>(store).unwrap() {
            assert_eq!(goal.user_id, user.id);
        }
        for id in &user.goal_ids {
            assert!(find_document::<Goal>(store, id).unwrap().is_some(), "goal {}", id);
        }
        for id in &user.account_ids {
            let account = find_document::<Account>(store, id).unwrap().unwrap();
            for tx in &account.transaction_ids {
                assert!(find_document::<Transaction>(store, tx).unwrap().is_some());
            }
        }
        for id in &user.transaction_ids {
            assert!(
                find_document::<Transaction>(store, id).unwrap().is_some(),
                "transaction {}",
                id
            );
        }
    }

    #[tokio::test]
    async fn missing_sentinel_clears_existing_data() {
        let store: Arc<dyn DocumentStoreTrait> = Arc::new(InMemoryDocumentStore::new());
        store
            .insert_many(
                Collection::Goals,
                vec![RawDocument::new("stale", json!({ "id": "stale" }))],
            )
            .await
            .unwrap();

        let (seed, _) = service(store.clone());
        seed.initialize().await.unwrap();

        assert!(store.find_by_id(Collection::Goals, "stale").unwrap().is_none());
        assert_eq!(store.count(Collection::Goals).unwrap(), 4);
    }

    #[tokio::test]
    async fn present_sentinel_leaves_data_alone() {
        let store: Arc<dyn DocumentStoreTrait> = Arc::new(InMemoryDocumentStore::new());
        store
            .insert_many(
                Collection::Users,
                vec![RawDocument::new(
                    SEED_SENTINEL_USER_ID,
                    json!({ "id": SEED_SENTINEL_USER_ID }),
                )],
            )
            .await
            .unwrap();

        let (seed, sink) = service(store.clone());
        assert_eq!(seed.initialize().await.unwrap(), SeedOutcome::AlreadySeeded);
        assert_eq!(store.count(Collection::Goals).unwrap(), 0);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn inconsistent_fixture_is_rejected_before_any_write() {
        let store: Arc<dyn DocumentStoreTrait> = Arc::new(InMemoryDocumentStore::new());
        store
            .insert_many(
                Collection::Tags,
                vec![RawDocument::new("keep", json!({ "id": "keep", "name": "Keep" }))],
            )
            .await
            .unwrap();

        let mut fixture = SeedFixture::embedded().unwrap();
        fixture.goals[0].user_id = "someone-else".to_string();
        let (seed, _) = service(store.clone());
        let seed = seed.with_fixture(fixture);

        assert!(matches!(seed.initialize().await, Err(Error::Seed(_))));
        assert!(store.find_by_id(Collection::Tags, "keep").unwrap().is_some());
    }

    struct FailingStore;

    #[async_trait]
    impl DocumentStoreTrait for FailingStore {
        fn find_by_id(&self, _: Collection, _: &str) -> Result<Option<RawDocument>> {
            Ok(None)
        }
        fn list(&self, _: Collection) -> Result<Vec<RawDocument>> {
            Ok(Vec::new())
        }
        fn count(&self, _: Collection) -> Result<usize> {
            Ok(0)
        }
        async fn insert_many(&self, _: Collection, _: Vec<RawDocument>) -> Result<usize> {
            unimplemented!()
        }
        async fn replace_one(&self, _: Collection, _: RawDocument) -> Result<bool> {
            unimplemented!()
        }
        async fn drop_collection(&self, _: Collection) -> Result<()> {
            unimplemented!()
        }
        async fn insert_with_replacements(
            &self,
            _: CollectionBatch,
            _: CollectionBatch,
        ) -> Result<()> {
            unimplemented!()
        }
        async fn reset_collections(&self, _: Vec<CollectionBatch>) -> Result<()> {
            Err(Error::Database(DatabaseError::TransactionFailed(
                "disk full".to_string(),
            )))
        }
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let (seed, sink) = service(Arc::new(FailingStore));
        let err = seed.initialize().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Database(DatabaseError::TransactionFailed(_))
        ));
        assert!(sink.is_empty());
    }
}
