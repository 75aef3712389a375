use crate::domain::{self, CustomerRepository};
use futures::{Stream, TryStreamExt};
use sqlx::{prelude::FromRow, PgPool};
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CustomerRepository for PgCustomerRepository {
    type Error = sqlx::Error;

    #[instrument(skip(self))]
    async fn save(&self, name: String) -> Result<domain::Customer, Self::Error> {
        let customer =
            sqlx::query_as::<_, Customer>("INSERT INTO customer (name) VALUES ($1) RETURNING *")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;

        debug!(id = customer.id, "inserted customer");
        Ok(customer.into())
    }

    #[instrument(skip(self))]
    async fn customer_by_id(&self, id: i64) -> Result<Option<domain::Customer>, Self::Error> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customer WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(customer.map(domain::Customer::from))
    }

    #[instrument(skip(self))]
    async fn customers(
        &self,
    ) -> Result<impl Stream<Item = Result<domain::Customer, Self::Error>> + Send, Self::Error> {
        let customers = sqlx::query_as::<_, Customer>("SELECT * FROM customer ORDER BY id")
            .fetch(&self.pool)
            .map_ok(domain::Customer::from);
        Ok(customers)
    }
}

#[derive(Debug, FromRow)]
struct Customer {
    id: i64,
    name: String,
}

impl From<Customer> for domain::Customer {
    fn from(Customer { id, name }: Customer) -> Self {
        domain::Customer { id, name }
    }
}
