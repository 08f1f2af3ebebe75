//! Account domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::documents::{Collection, Document};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    GoalSaver,
    NetBankSaver,
    SmartAccess,
}

/// Domain model representing a bank account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub number: i64,
    pub name: String,
    pub balance: Decimal,
    pub account_type: AccountType,
    /// Transactions booked against this account, in booking order
    #[serde(default)]
    pub transaction_ids: Vec<String>,
}

impl Document for Account {
    const COLLECTION: Collection = Collection::Accounts;

    fn id(&self) -> &str {
        &self.id
    }
}
