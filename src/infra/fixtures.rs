//! Demo data for tests: a handful of customers, each owning some accounts.

use crate::domain::{Account, AccountRepository, AccountType, Customer, CustomerRepository};
use error_ext::BoxError;
use time::OffsetDateTime;
use uuid::Uuid;

pub const CUSTOMER_NAMES: [&str; 4] = ["Ahmed", "Malak", "Laila", "Douaa"];

pub const ACCOUNTS_PER_CUSTOMER: usize = 10;

pub async fn seed<A, C>(
    account_repository: &A,
    customer_repository: &C,
) -> Result<Vec<Customer>, BoxError>
where
    A: AccountRepository,
    C: CustomerRepository,
{
    let mut customers = Vec::with_capacity(CUSTOMER_NAMES.len());

    for name in CUSTOMER_NAMES {
        let customer = customer_repository.save(name.to_string()).await?;

        for n in 0..ACCOUNTS_PER_CUSTOMER {
            let account_type = if n % 2 == 0 {
                AccountType::CurrentAccount
            } else {
                AccountType::SavingAccount
            };
            let account = Account {
                id: Uuid::now_v7().to_string(),
                created_at: OffsetDateTime::now_utc(),
                balance: Some(1000.0 + ((n * 7919) % 90000) as f64),
                currency: Some("MAD".to_string()),
                account_type,
                customer_id: Some(customer.id),
            };
            account_repository.save(account).await?;
        }

        customers.push(customer);
    }

    Ok(customers)
}
