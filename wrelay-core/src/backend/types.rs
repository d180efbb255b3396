//! Row and payload types for the wallet backend's REST layer.

use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `profiles` row projected down to the balance column.
#[derive(Debug, Deserialize)]
pub struct ProfileBalance {
    pub balance: Decimal,
}

/// Terminal states of an add-fund request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FundRequestStatus {
    Approved,
    Declined,
}

/// A completed transaction to append to the ledger.
#[derive(Debug, Clone, Serialize)]
pub struct NewTransaction {
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: Decimal,
    pub status: String,
    pub description: String,
}

impl NewTransaction {
    /// Ledger entry for an approved deposit (amount plus bonus credited).
    pub fn approved_deposit(user_id: String, amount: Decimal, bonus: Decimal) -> Self {
        Self {
            user_id,
            kind: "addfund".to_string(),
            amount: amount + bonus,
            status: "completed".to_string(),
            description: format!("Add fund approved ₹{amount} + ₹{bonus} bonus"),
        }
    }
}

/// `game_rounds` row projected down to the id column.
#[derive(Debug, Deserialize)]
pub struct GameRoundRow {
    pub id: Uuid,
}

/// Result of a big/small game round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundResult {
    Big,
    Small,
}

impl RoundResult {
    /// Draw a uniformly random result.
    pub fn random() -> Self {
        if rand::rng().random_bool(0.5) {
            Self::Big
        } else {
            Self::Small
        }
    }
}

impl std::fmt::Display for RoundResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Big => write!(f, "big"),
            Self::Small => write!(f, "small"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn statuses_serialize_lowercase() {
        let approved = serde_json::to_string(&FundRequestStatus::Approved).unwrap();
        assert_eq!(approved, "\"approved\"");
        let small = serde_json::to_string(&RoundResult::Small).unwrap();
        assert_eq!(small, "\"small\"");
    }

    #[test]
    fn approved_deposit_credits_amount_plus_bonus() {
        let tx = NewTransaction::approved_deposit("u1".into(), dec!(100), dec!(1));
        assert_eq!(tx.amount, dec!(101));
        assert_eq!(tx.kind, "addfund");
        assert_eq!(tx.status, "completed");
        assert!(tx.description.contains("₹100"));
        assert!(tx.description.contains("₹1 bonus"));
    }
}
