//! External money-movement seams: card/wallet gateway and bank balance feed.

use crate::model::bank_account::BankAccount;
use crate::model::payment::PaymentRecord;
use rust_decimal::Decimal;

/// Charges a payment through an external processor.
pub trait PaymentGateway: Send + Sync {
    fn name(&self) -> &str;
    /// Returns the processor's transaction reference on success.
    fn charge(&self, payment: &PaymentRecord) -> Result<String, String>;
}

/// Reads the current balance of a linked bank account.
pub trait BankingProvider: Send + Sync {
    fn name(&self) -> &str;
    fn fetch_balance(&self, account: &BankAccount) -> Result<Decimal, String>;
}
