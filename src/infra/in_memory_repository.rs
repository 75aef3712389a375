use crate::domain::{Account, AccountRepository, Customer, CustomerRepository};
use futures::{stream, Stream};
use std::{collections::HashMap, convert::Infallible, sync::Arc};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl AccountRepository for InMemoryAccountRepository {
    type Error = Infallible;

    async fn save(&self, account: Account) -> Result<Account, Self::Error> {
        self.accounts
            .write()
            .await
            .insert(account.id.clone(), account.clone());
        Ok(account)
    }

    async fn account_by_id(&self, id: &str) -> Result<Option<Account>, Self::Error> {
        Ok(self.accounts.read().await.get(id).cloned())
    }

    async fn accounts(
        &self,
    ) -> Result<impl Stream<Item = Result<Account, Self::Error>> + Send, Self::Error> {
        let accounts = self
            .accounts
            .read()
            .await
            .values()
            .cloned()
            .collect::<Vec<_>>();
        Ok(stream::iter(accounts.into_iter().map(Ok)))
    }

    async fn update<F>(&self, id: &str, f: F) -> Result<Option<Account>, Self::Error>
    where
        F: FnOnce(Account) -> Account + Send,
    {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get(id).cloned().map(f).map(|account| Account {
            id: id.to_string(),
            ..account
        });
        if let Some(account) = &account {
            accounts.insert(account.id.clone(), account.clone());
        }
        Ok(account)
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), Self::Error> {
        self.accounts.write().await.remove(id);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomerRepository {
    customers: Arc<RwLock<Vec<Customer>>>,
}

impl CustomerRepository for InMemoryCustomerRepository {
    type Error = Infallible;

    async fn save(&self, name: String) -> Result<Customer, Self::Error> {
        let mut customers = self.customers.write().await;
        let customer = Customer {
            id: customers.len() as i64 + 1,
            name,
        };
        customers.push(customer.clone());
        Ok(customer)
    }

    async fn customer_by_id(&self, id: i64) -> Result<Option<Customer>, Self::Error> {
        let customers = self.customers.read().await;
        Ok(customers.iter().find(|customer| customer.id == id).cloned())
    }

    async fn customers(
        &self,
    ) -> Result<impl Stream<Item = Result<Customer, Self::Error>> + Send, Self::Error> {
        let customers = self.customers.read().await.clone();
        Ok(stream::iter(customers.into_iter().map(Ok)))
    }
}
