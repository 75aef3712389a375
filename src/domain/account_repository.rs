use crate::domain::Account;
use futures::Stream;
use std::error::Error as StdError;

#[trait_variant::make(Send)]
pub trait AccountRepository
where
    Self: Clone + Send + Sync + 'static,
{
    type Error: StdError + Send + Sync + 'static;

    /// Insert the given new account and return it as persisted.
    async fn save(&self, account: Account) -> Result<Account, Self::Error>;

    async fn account_by_id(&self, id: &str) -> Result<Option<Account>, Self::Error>;

    async fn accounts(
        &self,
    ) -> Result<impl Stream<Item = Result<Account, Self::Error>> + Send, Self::Error>;

    /// Atomically read the account with the given ID, apply `f` and write back the result. Returns
    /// `None` without writing if there is no such account.
    async fn update<F>(&self, id: &str, f: F) -> Result<Option<Account>, Self::Error>
    where
        F: FnOnce(Account) -> Account + Send;

    /// Delete the account with the given ID; deleting an unknown ID is not an error.
    async fn delete_by_id(&self, id: &str) -> Result<(), Self::Error>;
}
