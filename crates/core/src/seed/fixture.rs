//! The declarative seed fixture and its integrity checks.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::accounts::Account;
use crate::constants::{SEED_FIXTURE_VERSION, SEED_SENTINEL_USER_ID};
use crate::documents::{Collection, CollectionBatch, Document};
use crate::errors::{Error, Result};
use crate::goals::Goal;
use crate::tags::Tag;
use crate::transactions::Transaction;
use crate::users::User;

const EMBEDDED_FIXTURE: &str = include_str!("fixtures/seed_v1.json");

/// One user owning one account, its goals, tags and transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedFixture {
    pub version: u32,
    pub tags: Vec<Tag>,
    pub accounts: Vec<Account>,
    pub goals: Vec<Goal>,
    pub transactions: Vec<Transaction>,
    pub user: User,
}

/// Number of documents a fixture writes per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub fixture_version: u32,
    pub users: usize,
    pub accounts: usize,
    pub goals: usize,
    pub tags: usize,
    pub transactions: usize,
}

impl SeedSummary {
    pub fn total(&self) -> usize {
        self.users + self.accounts + self.goals + self.tags + self.transactions
    }
}

impl SeedFixture {
    /// The fixture compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_FIXTURE)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let fixture: SeedFixture = serde_json::from_str(json)
            .map_err(|e| Error::Seed(format!("Unreadable fixture: {}", e)))?;
        if fixture.version != SEED_FIXTURE_VERSION {
            return Err(Error::Seed(format!(
                "Fixture version {} is not supported (expected {})",
                fixture.version, SEED_FIXTURE_VERSION
            )));
        }
        Ok(fixture)
    }

    pub fn summary(&self) -> SeedSummary {
        SeedSummary {
            fixture_version: self.version,
            users: 1,
            accounts: self.accounts.len(),
            goals: self.goals.len(),
            tags: self.tags.len(),
            transactions: self.transactions.len(),
        }
    }

    /// Checks id uniqueness and every cross reference. All problems are
    /// reported together.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.user.id != SEED_SENTINEL_USER_ID {
            problems.push(format!(
                "user id '{}' is not the sentinel '{}'",
                self.user.id, SEED_SENTINEL_USER_ID
            ));
        }

        let tag_ids = unique_ids(Collection::Tags, &self.tags, &mut problems);
        let account_ids = unique_ids(Collection::Accounts, &self.accounts, &mut problems);
        let goal_ids = unique_ids(Collection::Goals, &self.goals, &mut problems);
        let transaction_ids =
            unique_ids(Collection::Transactions, &self.transactions, &mut problems);

        for goal in &self.goals {
            if goal.user_id != self.user.id {
                problems.push(format!("goal '{}' belongs to unknown user '{}'", goal.id, goal.user_id));
            }
        }
        for transaction in &self.transactions {
            if transaction.user_id != self.user.id {
                problems.push(format!(
                    "transaction '{}' belongs to unknown user '{}'",
                    transaction.id, transaction.user_id
                ));
            }
            for tag_id in &transaction.tag_ids {
                if !tag_ids.contains(tag_id.as_str()) {
                    problems.push(format!(
                        "transaction '{}' references unknown tag '{}'",
                        transaction.id, tag_id
                    ));
                }
            }
        }
        for account in &self.accounts {
            dangling(
                &format!("account '{}'", account.id),
                &account.transaction_ids,
                &transaction_ids,
                &mut problems,
            );
        }
        let owner = format!("user '{}'", self.user.id);
        dangling(&owner, &self.user.account_ids, &account_ids, &mut problems);
        dangling(&owner, &self.user.goal_ids, &goal_ids, &mut problems);
        dangling(&owner, &self.user.transaction_ids, &transaction_ids, &mut problems);

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::Seed(format!(
                "Fixture is inconsistent: {}",
                problems.join("; ")
            )))
        }
    }

    /// Converts the fixture into insert batches. The user comes last so the
    /// sentinel only exists once everything it points at does.
    pub fn into_batches(self) -> Result<Vec<CollectionBatch>> {
        Ok(vec![
            batch(Collection::Tags, &self.tags)?,
            batch(Collection::Accounts, &self.accounts)?,
            batch(Collection::Goals, &self.goals)?,
            batch(Collection::Transactions, &self.transactions)?,
            batch(Collection::Users, std::slice::from_ref(&self.user))?,
        ])
    }
}

fn batch<T: Document>(collection: Collection, records: &[T]) -> Result<CollectionBatch> {
    Ok(CollectionBatch {
        collection,
        documents: records
            .iter()
            .map(|record| record.to_raw())
            .collect::<Result<Vec<_>>>()?,
    })
}

fn unique_ids<'a, T: Document>(
    collection: Collection,
    records: &'a [T],
    problems: &mut Vec<String>,
) -> HashSet<&'a str> {
    let mut ids = HashSet::new();
    for record in records {
        if !ids.insert(record.id()) {
            problems.push(format!("duplicate {} id '{}'", collection, record.id()));
        }
    }
    ids
}

fn dangling(owner: &str, refs: &[String], known: &HashSet<&str>, problems: &mut Vec<String>) {
    for id in refs {
        if !known.contains(id.as_str()) {
            problems.push(format!("{} references unknown id '{}'", owner, id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_fixture_has_expected_shape() {
        let fixture = SeedFixture::embedded().unwrap();
        let summary = fixture.summary();
        assert_eq!(summary.users, 1);
        assert_eq!(summary.accounts, 1);
        assert_eq!(summary.goals, 4);
        assert_eq!(summary.tags, 5);
        assert_eq!(summary.transactions, 14);
        assert_eq!(summary.total(), 25);
        assert_eq!(fixture.user.id, SEED_SENTINEL_USER_ID);
    }

    #[test]
    fn embedded_fixture_is_consistent() {
        SeedFixture::embedded().unwrap().validate().unwrap();
    }

    #[test]
    fn dangling_references_are_all_reported() {
        let mut fixture = SeedFixture::embedded().unwrap();
        fixture.transactions[0].tag_ids.push("no-such-tag".to_string());
        fixture.user.goal_ids.push("no-such-goal".to_string());

        let message = fixture.validate().unwrap_err().to_string();
        assert!(message.contains("no-such-tag"), "{}", message);
        assert!(message.contains("no-such-goal"), "{}", message);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut fixture = SeedFixture::embedded().unwrap();
        let copy = fixture.tags[0].clone();
        fixture.tags.push(copy);
        assert!(matches!(fixture.validate(), Err(Error::Seed(_))));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let json = EMBEDDED_FIXTURE.replacen("\"version\": 1", "\"version\": 99", 1);
        assert!(matches!(SeedFixture::from_json(&json), Err(Error::Seed(_))));
    }

    #[test]
    fn user_is_the_last_batch() {
        let batches = SeedFixture::embedded().unwrap().into_batches().unwrap();
        let order: Vec<_> = batches.iter().map(|b| b.collection).collect();
        assert_eq!(
            order,
            vec![
                Collection::Tags,
                Collection::Accounts,
                Collection::Goals,
                Collection::Transactions,
                Collection::Users
            ]
        );
    }
}
