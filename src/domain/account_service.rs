use crate::domain::{
    AccountRepository, AccountRequest, AccountResponse, Customer, CustomerRepository,
};
use error_ext::BoxError;
use futures::TryStreamExt;
use std::error::Error as StdError;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Business logic for bank accounts, shared by the REST and GraphQL APIs.
#[derive(Debug, Clone)]
pub struct AccountService<A, C> {
    account_repository: A,
    customer_repository: C,
}

impl<A, C> AccountService<A, C>
where
    A: AccountRepository,
    C: CustomerRepository,
{
    pub fn new(account_repository: A, customer_repository: C) -> Self {
        Self {
            account_repository,
            customer_repository,
        }
    }

    /// Create a new account with a fresh ID and the current time as creation timestamp.
    #[instrument(skip(self))]
    pub async fn add_account(&self, request: AccountRequest) -> Result<AccountResponse, Error> {
        let id = Uuid::now_v7().to_string();
        let account = request
            .into_account(id, OffsetDateTime::now_utc())
            .ok_or_else(|| Error::InvalidArgument("account type must be given".to_string()))?;

        let account = self
            .account_repository
            .save(account)
            .await
            .map_err(Error::store)?;

        info!(id = %account.id, "account created");
        Ok(account.into())
    }

    #[instrument(skip(self))]
    pub async fn get_account(&self, id: &str) -> Result<AccountResponse, Error> {
        let account = self
            .account_repository
            .account_by_id(id)
            .await
            .map_err(Error::store)?
            .map(AccountResponse::from)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        debug!(id, "got account");
        Ok(account)
    }

    #[instrument(skip(self))]
    pub async fn list_accounts(&self) -> Result<Vec<AccountResponse>, Error> {
        let accounts = self
            .account_repository
            .accounts()
            .await
            .map_err(Error::store)?
            .map_ok(AccountResponse::from)
            .map_err(Error::store)
            .try_collect::<Vec<_>>()
            .await?;

        debug!(count = accounts.len(), "listed accounts");
        Ok(accounts)
    }

    /// Overwrite the fields present in the given request, keeping all others. The creation
    /// timestamp is set to the current time on every update.
    #[instrument(skip(self))]
    pub async fn update_account(
        &self,
        id: &str,
        request: AccountRequest,
    ) -> Result<AccountResponse, Error> {
        let now = OffsetDateTime::now_utc();

        let account = self
            .account_repository
            .update(id, move |account| {
                let mut account = request.patch(account);
                account.created_at = now;
                account
            })
            .await
            .map_err(Error::store)?
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        info!(id, "account updated");
        Ok(account.into())
    }

    /// Delete the account with the given ID. Deleting a nonexistent account succeeds.
    #[instrument(skip(self))]
    pub async fn delete_account(&self, id: &str) -> Result<(), Error> {
        self.account_repository
            .delete_by_id(id)
            .await
            .map_err(Error::store)?;

        info!(id, "account deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn customers(&self) -> Result<Vec<Customer>, Error> {
        let customers = self
            .customer_repository
            .customers()
            .await
            .map_err(Error::store)?
            .map_err(Error::store)
            .try_collect::<Vec<_>>()
            .await?;

        debug!(count = customers.len(), "listed customers");
        Ok(customers)
    }

    #[instrument(skip(self))]
    pub async fn customer(&self, id: i64) -> Result<Option<Customer>, Error> {
        let customer = self
            .customer_repository
            .customer_by_id(id)
            .await
            .map_err(Error::store)?;

        debug!(id, found = customer.is_some(), "looked up customer");
        Ok(customer)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("account with ID {0} not found")]
    NotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("store failure")]
    Store(#[source] BoxError),
}

impl Error {
    fn store<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Error::Store(error.into())
    }
}
