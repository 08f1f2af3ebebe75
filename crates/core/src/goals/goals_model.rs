//! Goals domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::documents::{Collection, Document};
use crate::Amount;

/// Domain model representing a savings goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target_amount: Amount,
    #[serde(default)]
    pub target_date: Option<DateTime<Utc>>,
    /// Accumulated so far. Only transaction processing moves this.
    #[serde(default)]
    pub balance: Decimal,
    pub created: DateTime<Utc>,
    /// A single emoji glyph
    #[serde(default)]
    pub icon: Option<String>,
    pub user_id: String,
}

impl Goal {
    pub fn is_target_reached(&self) -> bool {
        self.balance >= self.target_amount.value()
    }

    /// What is still missing to reach the target, never below zero.
    pub fn remaining(&self) -> Decimal {
        (self.target_amount.value() - self.balance).max(Decimal::ZERO)
    }

    /// Copies the user-editable fields from `edited`, keeping identity,
    /// ownership, creation time and balance from `self`.
    pub fn with_editable_fields_of(&self, edited: &Goal) -> Goal {
        Goal {
            name: edited.name.clone(),
            target_amount: edited.target_amount,
            target_date: edited.target_date,
            icon: edited.icon.clone(),
            ..self.clone()
        }
    }
}

impl Document for Goal {
    const COLLECTION: Collection = Collection::Goals;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Input model for creating a new goal
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub name: String,
    pub target_amount: Amount,
    #[serde(default)]
    pub target_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub icon: Option<String>,
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn goal(target: Decimal, balance: Decimal) -> Goal {
        Goal {
            id: "g1".to_string(),
            name: "Trip to NYC".to_string(),
            target_amount: Amount::new(target).unwrap(),
            target_date: None,
            balance,
            created: Utc::now(),
            icon: None,
            user_id: "u1".to_string(),
        }
    }

    #[test]
    fn target_reached_is_derived_from_balance() {
        assert!(!goal(dec!(800), dec!(0)).is_target_reached());
        assert!(goal(dec!(800), dec!(800)).is_target_reached());
        assert_eq!(goal(dec!(800), dec!(900)).remaining(), Decimal::ZERO);
        assert_eq!(goal(dec!(3500), dec!(753.89)).remaining(), dec!(2746.11));
    }

    #[test]
    fn editable_fields_never_touch_balance_or_identity() {
        let stored = goal(dec!(100), dec!(40));
        let mut edited = stored.clone();
        edited.id = "other".to_string();
        edited.name = "Renamed".to_string();
        edited.balance = dec!(99999);
        edited.icon = Some("🏖".to_string());

        let merged = stored.with_editable_fields_of(&edited);
        assert_eq!(merged.id, "g1");
        assert_eq!(merged.balance, dec!(40));
        assert_eq!(merged.name, "Renamed");
        assert_eq!(merged.icon.as_deref(), Some("🏖"));
    }

    #[test]
    fn serializes_camel_case_with_null_optionals() {
        let json = serde_json::to_value(goal(dec!(100), dec!(0))).unwrap();
        assert_eq!(json["targetAmount"], serde_json::json!(100.0));
        assert!(json["targetDate"].is_null());
        assert!(json["icon"].is_null());
        assert_eq!(json["userId"], "u1");
    }
}
