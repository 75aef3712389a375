use crate::domain::{self, AccountRepository};
use futures::{Stream, TryStreamExt};
use sqlx::{prelude::FromRow, PgPool, QueryBuilder};
use std::iter::once;
use time::OffsetDateTime;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AccountRepository for PgAccountRepository {
    type Error = sqlx::Error;

    #[instrument(skip(self))]
    async fn save(&self, account: domain::Account) -> Result<domain::Account, Self::Error> {
        let account = QueryBuilder::new(
            "INSERT INTO account (id, created_at, balance, currency, type, customer_id) ",
        )
        .push_values(once(account), |mut q, account| {
            q.push_bind(account.id)
                .push_bind(account.created_at)
                .push_bind(account.balance)
                .push_bind(account.currency)
                .push_bind(AccountType::from(account.account_type))
                .push_bind(account.customer_id);
        })
        .push(" RETURNING *")
        .build_query_as::<Account>()
        .fetch_one(&self.pool)
        .await?;

        debug!(id = %account.id, "inserted account");
        Ok(account.into())
    }

    #[instrument(skip(self))]
    async fn account_by_id(&self, id: &str) -> Result<Option<domain::Account>, Self::Error> {
        let account = QueryBuilder::new("SELECT * FROM account WHERE id = ")
            .push_bind(id)
            .build_query_as::<Account>()
            .fetch_optional(&self.pool)
            .await?;
        let account = account.map(domain::Account::from);
        Ok(account)
    }

    #[instrument(skip(self))]
    async fn accounts(
        &self,
    ) -> Result<impl Stream<Item = Result<domain::Account, Self::Error>> + Send, Self::Error> {
        let accounts = sqlx::query_as::<_, Account>("SELECT * FROM account")
            .fetch(&self.pool)
            .map_ok(domain::Account::from);
        Ok(accounts)
    }

    #[instrument(skip(self, f))]
    async fn update<F>(&self, id: &str, f: F) -> Result<Option<domain::Account>, Self::Error>
    where
        F: FnOnce(domain::Account) -> domain::Account + Send,
    {
        let mut tx = self.pool.begin().await?;

        let account = QueryBuilder::new("SELECT * FROM account WHERE id = ")
            .push_bind(id)
            .push(" FOR UPDATE")
            .build_query_as::<Account>()
            .fetch_optional(&mut *tx)
            .await?;
        let Some(account) = account else {
            return Ok(None);
        };

        let account = f(account.into());
        let account = QueryBuilder::new("UPDATE account SET created_at = ")
            .push_bind(account.created_at)
            .push(", balance = ")
            .push_bind(account.balance)
            .push(", currency = ")
            .push_bind(account.currency)
            .push(", type = ")
            .push_bind(AccountType::from(account.account_type))
            .push(", customer_id = ")
            .push_bind(account.customer_id)
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING *")
            .build_query_as::<Account>()
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(id, "updated account");
        Ok(Some(account.into()))
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: &str) -> Result<(), Self::Error> {
        let result = QueryBuilder::new("DELETE FROM account WHERE id = ")
            .push_bind(id)
            .build()
            .execute(&self.pool)
            .await?;

        debug!(id, rows_affected = result.rows_affected(), "deleted account");
        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct Account {
    id: String,
    created_at: OffsetDateTime,
    balance: Option<f64>,
    currency: Option<String>,
    #[sqlx(rename = "type")]
    account_type: AccountType,
    customer_id: Option<i64>,
}

impl From<Account> for domain::Account {
    fn from(account: Account) -> Self {
        let Account {
            id,
            created_at,
            balance,
            currency,
            account_type,
            customer_id,
        } = account;

        domain::Account {
            id,
            created_at,
            balance,
            currency,
            account_type: account_type.into(),
            customer_id,
        }
    }
}

#[derive(Debug, Clone, Copy, sqlx::Type)]
#[sqlx(type_name = "account_type", rename_all = "SCREAMING_SNAKE_CASE")]
enum AccountType {
    CurrentAccount,
    SavingAccount,
}

impl From<domain::AccountType> for AccountType {
    fn from(account_type: domain::AccountType) -> Self {
        match account_type {
            domain::AccountType::CurrentAccount => AccountType::CurrentAccount,
            domain::AccountType::SavingAccount => AccountType::SavingAccount,
        }
    }
}

impl From<AccountType> for domain::AccountType {
    fn from(account_type: AccountType) -> Self {
        match account_type {
            AccountType::CurrentAccount => domain::AccountType::CurrentAccount,
            AccountType::SavingAccount => domain::AccountType::SavingAccount,
        }
    }
}
