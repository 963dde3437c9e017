//! Ledger transaction model.
//!
//! Transactions are immutable once generated. The sign of `amount` always
//! follows the transaction type: DEBIT is negative, every other type positive.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::services::{query::Filterable, store::Entity};

code_enum! {
    pub enum TransactionType {
        Debit => "DEBIT",
        Credit => "CREDIT",
        Transfer => "TRANSFER",
        Payment => "PAYMENT",
        Fee => "FEE",
    }
}

code_enum! {
    pub enum TransactionStatus {
        Pending => "PENDING",
        Completed => "COMPLETED",
        Failed => "FAILED",
    }
}

code_enum! {
    /// Channel the transaction was initiated through.
    pub enum Channel {
        Online => "ONLINE",
        Pos => "POS",
    }
}

impl TransactionType {
    /// Apply this type's sign convention to a magnitude.
    pub fn signed(&self, magnitude: f64) -> f64 {
        let magnitude = magnitude.abs();
        match self {
            Self::Debit => -magnitude,
            _ => magnitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    pub name: String,
    pub category: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMetadata {
    pub channel: Channel,
    pub card_last4: String,
    pub authorization_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_id: String,
    pub account_id: String,
    transaction_type: TransactionType,
    amount: f64,
    pub currency: String,
    pub description: String,
    pub transaction_date: DateTime<Utc>,
    pub value_date: DateTime<Utc>,
    pub status: TransactionStatus,
    /// Running balance snapshot after this transaction.
    pub balance: f64,
    pub merchant: Merchant,
    pub metadata: TransactionMetadata,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        transaction_id: String,
        account_id: String,
        transaction_type: TransactionType,
        magnitude: f64,
        currency: String,
        transaction_date: DateTime<Utc>,
        value_date: DateTime<Utc>,
        balance: f64,
        merchant: Merchant,
        metadata: TransactionMetadata,
    ) -> Self {
        Self {
            transaction_id,
            account_id,
            transaction_type,
            amount: transaction_type.signed(magnitude),
            currency,
            description: format!("{} - {}", merchant.name, merchant.category),
            transaction_date,
            value_date,
            status: TransactionStatus::Completed,
            balance,
            merchant,
            metadata,
        }
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }
}

impl Entity for Transaction {
    const KIND: &'static str = "transaction";

    fn id(&self) -> &str {
        &self.transaction_id
    }
}

impl Filterable for Transaction {
    fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            "accountId" => Some(&self.account_id),
            "transactionType" => Some(self.transaction_type.as_str()),
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }

    fn event_date(&self) -> Option<NaiveDate> {
        Some(self.transaction_date.date_naive())
    }

    fn magnitude(&self) -> Option<f64> {
        Some(self.amount.abs())
    }

    fn sort_key(&self) -> Option<DateTime<Utc>> {
        Some(self.transaction_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample(transaction_type: TransactionType, magnitude: f64) -> Transaction {
        let now = Utc::now();
        Transaction::new(
            "txn-test".to_string(),
            "acc-123456789".to_string(),
            transaction_type,
            magnitude,
            "GBP".to_string(),
            now,
            now,
            1500.0,
            Merchant {
                name: "Netflix".to_string(),
                category: "Entertainment".to_string(),
                location: "Online".to_string(),
            },
            TransactionMetadata {
                channel: Channel::Online,
                card_last4: "4242".to_string(),
                authorization_code: "AUTH123456".to_string(),
            },
        )
    }

    #[rstest]
    #[case(TransactionType::Debit, -25.5)]
    #[case(TransactionType::Credit, 25.5)]
    #[case(TransactionType::Transfer, 25.5)]
    #[case(TransactionType::Payment, 25.5)]
    #[case(TransactionType::Fee, 25.5)]
    fn amount_sign_follows_type(#[case] transaction_type: TransactionType, #[case] expected: f64) {
        assert_eq!(sample(transaction_type, 25.5).amount(), expected);
        assert_eq!(sample(transaction_type, -25.5).amount(), expected);
    }

    #[test]
    fn serializes_with_wire_names() {
        let json = serde_json::to_value(sample(TransactionType::Debit, 10.0)).unwrap();
        assert_eq!(json["transactionType"], "DEBIT");
        assert_eq!(json["amount"], -10.0);
        assert_eq!(json["description"], "Netflix - Entertainment");
        assert_eq!(json["metadata"]["cardLast4"], "4242");
    }
}
