use crate::domain::{Account, AccountType};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

/// Request representation for creating or updating an account. Every field is optional: on
/// update, absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    pub balance: Option<f64>,
    pub currency: Option<String>,
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
    pub customer_id: Option<i64>,
}

impl AccountRequest {
    /// Build a new account from this request, using the given server assigned identity. Returns
    /// `None` if the account type is missing.
    pub fn into_account(self, id: String, created_at: OffsetDateTime) -> Option<Account> {
        let AccountRequest {
            balance,
            currency,
            account_type,
            customer_id,
        } = self;

        account_type.map(|account_type| Account {
            id,
            created_at,
            balance,
            currency,
            account_type,
            customer_id,
        })
    }

    /// Overwrite the fields of the given account which are present in this request.
    pub fn patch(self, mut account: Account) -> Account {
        if let Some(balance) = self.balance {
            account.balance = Some(balance);
        }
        if let Some(currency) = self.currency {
            account.currency = Some(currency);
        }
        if let Some(account_type) = self.account_type {
            account.account_type = account_type;
        }
        if let Some(customer_id) = self.customer_id {
            account.customer_id = Some(customer_id);
        }
        account
    }
}

/// Response representation of an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub balance: Option<f64>,
    pub currency: Option<String>,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub customer_id: Option<i64>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        let Account {
            id,
            created_at,
            balance,
            currency,
            account_type,
            customer_id,
        } = account;

        AccountResponse {
            id,
            created_at,
            balance,
            currency,
            account_type,
            customer_id,
        }
    }
}

/// Reduced representation of an account, exposing only its identity and type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccountProjection {
    pub id: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
}

impl From<AccountResponse> for AccountProjection {
    fn from(account: AccountResponse) -> Self {
        AccountProjection {
            id: account.id,
            account_type: account.account_type,
        }
    }
}
