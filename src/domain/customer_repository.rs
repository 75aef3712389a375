use crate::domain::Customer;
use futures::Stream;
use std::error::Error as StdError;

#[trait_variant::make(Send)]
pub trait CustomerRepository
where
    Self: Clone + Send + Sync + 'static,
{
    type Error: StdError + Send + Sync + 'static;

    /// Insert a new customer with the given name; the ID is assigned by the store.
    async fn save(&self, name: String) -> Result<Customer, Self::Error>;

    async fn customer_by_id(&self, id: i64) -> Result<Option<Customer>, Self::Error>;

    async fn customers(
        &self,
    ) -> Result<impl Stream<Item = Result<Customer, Self::Error>> + Send, Self::Error>;
}
