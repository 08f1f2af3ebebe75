use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::documents::{
    find_document, list_documents, replace_document, CollectionBatch, Document,
    DocumentStoreTrait,
};
use crate::errors::{Error, Result, ValidationError};
use crate::events::{DomainEvent, DomainEventSink};
use crate::goals::goals_model::{Goal, NewGoal};
use crate::goals::goals_traits::GoalServiceTrait;
use crate::users::User;

pub struct GoalService {
    store: Arc<dyn DocumentStoreTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl GoalService {
    pub fn new(store: Arc<dyn DocumentStoreTrait>, event_sink: Arc<dyn DomainEventSink>) -> Self {
        GoalService { store, event_sink }
    }

    fn require_user(&self, user_id: &str) -> Result<User> {
        find_document::<User>(self.store.as_ref(), user_id)?
            .ok_or_else(|| Error::NotFound(format!("User '{}'", user_id)))
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    fn get_goals(&self) -> Result<Vec<Goal>> {
        list_documents::<Goal>(self.store.as_ref())
    }

    fn get_goal(&self, goal_id: &str) -> Result<Goal> {
        find_document::<Goal>(self.store.as_ref(), goal_id)?
            .ok_or_else(|| Error::NotFound(format!("Goal '{}'", goal_id)))
    }

    fn get_goals_for_user(&self, user_id: &str) -> Result<Vec<Goal>> {
        let user = self.require_user(user_id)?;
        user.goal_ids
            .iter()
            .filter_map(|id| find_document::<Goal>(self.store.as_ref(), id).transpose())
            .collect()
    }

    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal> {
        if new_goal.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        let mut user = self.require_user(&new_goal.user_id)?;

        let goal = Goal {
            id: Uuid::new_v4().to_string(),
            name: new_goal.name,
            target_amount: new_goal.target_amount,
            target_date: new_goal.target_date,
            balance: Decimal::ZERO,
            created: Utc::now(),
            icon: new_goal.icon,
            user_id: new_goal.user_id,
        };
        user.goal_ids.push(goal.id.clone());
        self.store
            .insert_with_replacements(
                CollectionBatch {
                    collection: Goal::COLLECTION,
                    documents: vec![goal.to_raw()?],
                },
                CollectionBatch {
                    collection: User::COLLECTION,
                    documents: vec![user.to_raw()?],
                },
            )
            .await?;

        debug!("Created goal {} for user {}", goal.id, goal.user_id);
        self.event_sink
            .emit(DomainEvent::goals_changed(vec![goal.id.clone()]));
        Ok(goal)
    }

    async fn update_goal(&self, goal_id: &str, goal: Goal) -> Result<Goal> {
        if goal.id != goal_id {
            return Err(ValidationError::IdMismatch {
                path: goal_id.to_string(),
                body: goal.id,
            }
            .into());
        }

        let stored = self.get_goal(goal_id)?;
        let updated = stored.with_editable_fields_of(&goal);
        if !replace_document(self.store.as_ref(), &updated).await? {
            return Err(Error::NotFound(format!("Goal '{}'", goal_id)));
        }

        debug!("Updated goal {}", goal_id);
        self.event_sink
            .emit(DomainEvent::goals_changed(vec![goal_id.to_string()]));
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{Collection, InMemoryDocumentStore, RawDocument};
    use crate::errors::DatabaseError;
    use crate::events::MockDomainEventSink;
    use crate::seed::SeedService;
    use crate::{constants::SEED_SENTINEL_USER_ID, Amount};
    use rust_decimal_macros::dec;

    const HOUSE_GOAL_ID: &str = "62a3f587102e921da1253d32";

    async fn seeded_service() -> (GoalService, MockDomainEventSink) {
        let store: Arc<dyn DocumentStoreTrait> = Arc::new(InMemoryDocumentStore::new());
        SeedService::new(store.clone(), Arc::new(MockDomainEventSink::new()))
            .initialize()
            .await
            .unwrap();
        let sink = MockDomainEventSink::new();
        (GoalService::new(store, Arc::new(sink.clone())), sink)
    }

    #[tokio::test]
    async fn lists_goals_for_the_seeded_user() {
        let (service, _) = seeded_service().await;
        let goals = service.get_goals_for_user(SEED_SENTINEL_USER_ID).unwrap();
        let names: Vec<_> = goals.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "House Down Payment",
                "Tesla Model Y",
                "Trip to London",
                "Trip to NYC"
            ]
        );
        assert!(matches!(
            service.get_goals_for_user("nobody"),
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_applies_only_editable_fields() {
        let (service, sink) = seeded_service().await;
        let stored = service.get_goal(HOUSE_GOAL_ID).unwrap();

        let mut projection = stored.clone();
        projection.name = "Bigger House".to_string();
        projection.target_amount = Amount::new(dec!(150000)).unwrap();
        projection.icon = Some("🏠".to_string());
        projection.balance = dec!(1);

        let updated = service
            .update_goal(HOUSE_GOAL_ID, projection)
            .await
            .unwrap();
        assert_eq!(updated.name, "Bigger House");
        assert_eq!(updated.target_amount.value(), dec!(150000));
        assert_eq!(updated.balance, stored.balance);
        assert_eq!(updated.created, stored.created);
        assert_eq!(service.get_goal(HOUSE_GOAL_ID).unwrap(), updated);
        assert_eq!(
            sink.events(),
            vec![DomainEvent::goals_changed(vec![HOUSE_GOAL_ID.to_string()])]
        );
    }

    #[tokio::test]
    async fn update_rejects_mismatched_or_unknown_ids() {
        let (service, sink) = seeded_service().await;
        let goal = service.get_goal(HOUSE_GOAL_ID).unwrap();

        let err = service.update_goal("other", goal.clone()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::IdMismatch { .. })
        ));

        let mut ghost = goal;
        ghost.id = "missing".to_string();
        let err = service.update_goal("missing", ghost).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn create_links_goal_to_its_user() {
        let (service, _) = seeded_service().await;
        let created = service
            .create_goal(NewGoal {
                name: "Emergency Fund".to_string(),
                target_amount: Amount::new(dec!(5000)).unwrap(),
                target_date: None,
                icon: None,
                user_id: SEED_SENTINEL_USER_ID.to_string(),
            })
            .await
            .unwrap();

        assert_eq!(created.balance, Decimal::ZERO);
        let goals = service.get_goals_for_user(SEED_SENTINEL_USER_ID).unwrap();
        assert_eq!(goals.len(), 5);
        assert_eq!(goals.last().unwrap().id, created.id);
    }

    #[tokio::test]
    async fn create_requires_a_name_and_an_existing_user() {
        let (service, _) = seeded_service().await;
        let blank = NewGoal {
            name: "  ".to_string(),
            target_amount: Amount::ZERO,
            target_date: None,
            icon: None,
            user_id: SEED_SENTINEL_USER_ID.to_string(),
        };
        assert!(matches!(
            service.create_goal(blank.clone()).await,
            Err(Error::Validation(ValidationError::MissingField(_)))
        ));

        let orphan = NewGoal {
            name: "Orphan".to_string(),
            user_id: "nobody".to_string(),
            ..blank
        };
        assert!(matches!(
            service.create_goal(orphan).await,
            Err(Error::NotFound(_))
        ));
    }

    /// Delegates to an in-memory store but fails the combined goal/user write.
    struct LinkFailingStore(InMemoryDocumentStore);

    #[async_trait]
    impl DocumentStoreTrait for LinkFailingStore {
        fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<RawDocument>> {
            self.0.find_by_id(collection, id)
        }
        fn list(&self, collection: Collection) -> Result<Vec<RawDocument>> {
            self.0.list(collection)
        }
        fn count(&self, collection: Collection) -> Result<usize> {
            self.0.count(collection)
        }
        async fn insert_many(
            &self,
            collection: Collection,
            documents: Vec<RawDocument>,
        ) -> Result<usize> {
            self.0.insert_many(collection, documents).await
        }
        async fn replace_one(&self, collection: Collection, document: RawDocument) -> Result<bool> {
            self.0.replace_one(collection, document).await
        }
        async fn drop_collection(&self, collection: Collection) -> Result<()> {
            self.0.drop_collection(collection).await
        }
        async fn insert_with_replacements(
            &self,
            _: CollectionBatch,
            _: CollectionBatch,
        ) -> Result<()> {
            Err(Error::Database(DatabaseError::TransactionFailed(
                "disk full".to_string(),
            )))
        }
        async fn reset_collections(&self, batches: Vec<CollectionBatch>) -> Result<()> {
            self.0.reset_collections(batches).await
        }
    }

    #[tokio::test]
    async fn failed_create_leaves_no_unlinked_goal() {
        let store = Arc::new(LinkFailingStore(InMemoryDocumentStore::new()));
        SeedService::new(store.clone(), Arc::new(MockDomainEventSink::new()))
            .initialize()
            .await
            .unwrap();
        let sink = MockDomainEventSink::new();
        let service = GoalService::new(store.clone(), Arc::new(sink.clone()));

        let result = service
            .create_goal(NewGoal {
                name: "Emergency Fund".to_string(),
                target_amount: Amount::new(dec!(5000)).unwrap(),
                target_date: None,
                icon: None,
                user_id: SEED_SENTINEL_USER_ID.to_string(),
            })
            .await;
        assert!(matches!(
            result,
            Err(Error::Database(DatabaseError::TransactionFailed(_)))
        ));
        assert_eq!(store.count(Collection::Goals).unwrap(), 4);
        assert_eq!(
            service.get_goals_for_user(SEED_SENTINEL_USER_ID).unwrap().len(),
            4
        );
        assert!(sink.is_empty());
    }
}
