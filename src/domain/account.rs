use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

/// A persisted bank account.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: String,
    pub created_at: OffsetDateTime,
    pub balance: Option<f64>,
    pub currency: Option<String>,
    pub account_type: AccountType,
    pub customer_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    CurrentAccount,
    SavingAccount,
}

/// Owner of any number of accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
}
