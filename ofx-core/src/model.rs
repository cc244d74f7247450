//! Domain records assembled from one statement.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount::to_minor_units;
use crate::date::PostedAt;
use crate::error::OfxResult;
use crate::kinds::{AccountType, TransactionType};

/// `SONRS > STATUS`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignOnStatus {
    pub code: Option<i32>,
    pub severity: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignOn {
    pub language: String,
    pub fi_id: String,
    pub fi_name: String,
    pub server_time: Option<PostedAt>,
    pub status: Option<SignOnStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub amount: Decimal,
    pub amount_in_pennies: i64,
    /// `None` when `DTASOF` is missing or unreadable.
    pub posted_at: Option<PostedAt>,
}

impl Balance {
    pub fn new(amount: Decimal, posted_at: Option<PostedAt>) -> OfxResult<Self> {
        Ok(Self {
            amount,
            amount_in_pennies: to_minor_units(amount)?,
            posted_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub amount: Decimal,
    pub amount_in_pennies: i64,
    pub fit_id: String,
    pub memo: String,
    pub name: String,
    pub payee: String,
    pub check_number: Option<String>,
    pub ref_number: Option<String>,
    pub posted_at: PostedAt,
    /// `DTUSER`, when the bank reports when the customer initiated it.
    pub occurred_at: Option<PostedAt>,
    pub kind: TransactionType,
    pub sic: Option<String>,
}

/// `BANKTRANLIST > DTSTART / DTEND`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementPeriod {
    pub start: Option<PostedAt>,
    pub end: Option<PostedAt>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Empty for credit-card statements, which carry no bank id.
    pub bank_id: String,
    pub id: String,
    pub kind: AccountType,
    pub currency: String,
    pub balance: Balance,
    pub available_balance: Option<Balance>,
    pub period: Option<StatementPeriod>,
    pub transactions: Vec<Transaction>,
}

impl Account {
    /// Sum of transaction amounts, in document currency.
    pub fn transactions_total(&self) -> Decimal {
        self.transactions.iter().map(|t| t.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    #[test]
    fn test_balance_minor_units_follow_amount() {
        let amount = Decimal::from_str("-1234.567").unwrap();
        let balance = Balance::new(amount, None).unwrap();
        assert_eq!(balance.amount_in_pennies, -123456);
        assert_eq!(balance.posted_at, None);
    }

    #[test]
    fn test_balance_serializes_amount_as_string() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let balance = Balance::new(Decimal::from_str("10.50").unwrap(), Some(PostedAt::Date(date)))
            .unwrap();
        let json = serde_json::to_value(&balance).unwrap();
        assert_eq!(json["amount"], "10.50");
        assert_eq!(json["amount_in_pennies"], 1050);
        assert_eq!(json["posted_at"]["Date"], "2024-03-31");
    }
}
