//! Bank account model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type BankAccountId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankAccountType {
    Checking,
    Savings,
    Credit,
    Business,
}

impl BankAccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::Credit => "credit",
            Self::Business => "business",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "checking" => Some(Self::Checking),
            "savings" => Some(Self::Savings),
            "credit" => Some(Self::Credit),
            "business" => Some(Self::Business),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: BankAccountId,
    pub account_name: String,
    pub bank_name: String,
    /// Only the last four digits are kept, e.g. `****1234`.
    pub account_number_masked: String,
    pub account_type: BankAccountType,
    pub currency: String,
    pub current_balance: Decimal,
    pub is_primary: bool,
    pub is_active: bool,
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl BankAccount {
    pub fn new(
        account_name: impl Into<String>,
        bank_name: impl Into<String>,
        account_number: &str,
        account_type: BankAccountType,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_name: account_name.into(),
            bank_name: bank_name.into(),
            account_number_masked: mask_account_number(account_number),
            account_type,
            currency: currency.into(),
            current_balance: Decimal::ZERO,
            is_primary: false,
            is_active: true,
            last_synced_at: None,
        }
    }
}

/// Keeps the last four digits of an account number.
pub fn mask_account_number(account_number: &str) -> String {
    let digits: Vec<char> = account_number
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
    format!("****{tail}")
}

#[cfg(test)]
mod tests {
    use super::mask_account_number;

    #[test]
    fn mask_keeps_last_four() {
        assert_eq!(mask_account_number("DE89 3704 0044 0532 0130 00"), "****3000");
        assert_eq!(mask_account_number("12"), "****12");
    }
}
