use crate::domain::{
    self, AccountRepository, AccountRequest, AccountResponse, AccountService, CustomerRepository,
};
use async_graphql::{
    http::GraphiQLSource, Context, EmptySubscription, Enum, ErrorExtensions, InputObject, Object,
    Result, Schema, SimpleObject, ID,
};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Extension, Router,
};
use error_ext::StdErrorExt;
use std::marker::PhantomData;
use time::OffsetDateTime;
use tracing::error;

pub type AccountSchema<A, C> = Schema<Query<A, C>, Mutation<A, C>, EmptySubscription>;

pub fn schema<A, C>(account_service: AccountService<A, C>) -> AccountSchema<A, C>
where
    A: AccountRepository,
    C: CustomerRepository,
{
    Schema::build(Query(PhantomData), Mutation(PhantomData), EmptySubscription)
        .data(account_service)
        .finish()
}

pub fn app<A, C>(schema: AccountSchema<A, C>) -> Router
where
    A: AccountRepository,
    C: CustomerRepository,
{
    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler::<A, C>))
        .layer(Extension(schema))
}

async fn graphql_handler<A, C>(
    Extension(schema): Extension<AccountSchema<A, C>>,
    request: GraphQLRequest,
) -> GraphQLResponse
where
    A: AccountRepository,
    C: CustomerRepository,
{
    schema.execute(request.into_inner()).await.into()
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

pub struct Query<A, C>(PhantomData<(A, C)>);

#[Object(name = "Query")]
impl<A, C> Query<A, C>
where
    A: AccountRepository,
    C: CustomerRepository,
{
    /// All bank accounts.
    async fn accounts_list(&self, ctx: &Context<'_>) -> Result<Vec<BankAccount<A, C>>> {
        let accounts = service::<A, C>(ctx)?
            .list_accounts()
            .await
            .map_err(graphql_error)?;
        Ok(accounts.into_iter().map(BankAccount::from).collect())
    }

    /// The bank account with the given ID.
    async fn account_by_id(&self, ctx: &Context<'_>, id: ID) -> Result<BankAccount<A, C>> {
        let account = service::<A, C>(ctx)?
            .get_account(&id)
            .await
            .map_err(graphql_error)?;
        Ok(account.into())
    }

    /// All customers.
    async fn customers(&self, ctx: &Context<'_>) -> Result<Vec<Customer>> {
        let customers = service::<A, C>(ctx)?
            .customers()
            .await
            .map_err(graphql_error)?;
        Ok(customers.into_iter().map(Customer::from).collect())
    }
}

pub struct Mutation<A, C>(PhantomData<(A, C)>);

#[Object(name = "Mutation")]
impl<A, C> Mutation<A, C>
where
    A: AccountRepository,
    C: CustomerRepository,
{
    async fn add_account(
        &self,
        ctx: &Context<'_>,
        input: BankAccountInput,
    ) -> Result<BankAccount<A, C>> {
        let account = service::<A, C>(ctx)?
            .add_account(input.into())
            .await
            .map_err(graphql_error)?;
        Ok(account.into())
    }

    /// Update the given fields of the bank account with the given ID.
    async fn update_account(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: Option<BankAccountInput>,
    ) -> Result<BankAccount<A, C>> {
        let input = input.ok_or_else(|| {
            graphql_error(domain::Error::InvalidArgument(
                "input must be given".to_string(),
            ))
        })?;

        let account = service::<A, C>(ctx)?
            .update_account(&id, input.into())
            .await
            .map_err(graphql_error)?;
        Ok(account.into())
    }

    /// Delete the bank account with the given ID, returning `true` also if it did not exist.
    async fn delete_account(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        service::<A, C>(ctx)?
            .delete_account(&id)
            .await
            .map_err(graphql_error)?;
        Ok(true)
    }
}

/// GraphQL representation of a bank account.
pub struct BankAccount<A, C> {
    inner: AccountResponse,
    _repositories: PhantomData<(A, C)>,
}

impl<A, C> From<AccountResponse> for BankAccount<A, C> {
    fn from(account: AccountResponse) -> Self {
        Self {
            inner: account,
            _repositories: PhantomData,
        }
    }
}

#[Object(name = "BankAccount")]
impl<A, C> BankAccount<A, C>
where
    A: AccountRepository,
    C: CustomerRepository,
{
    async fn id(&self) -> ID {
        ID(self.inner.id.clone())
    }

    /// Time of creation, reset on every update.
    async fn created_at(&self) -> OffsetDateTime {
        self.inner.created_at
    }

    async fn balance(&self) -> Option<f64> {
        self.inner.balance
    }

    async fn currency(&self) -> Option<&str> {
        self.inner.currency.as_deref()
    }

    #[graphql(name = "type")]
    async fn account_type(&self) -> AccountType {
        self.inner.account_type.into()
    }

    async fn customer_id(&self) -> Option<i64> {
        self.inner.customer_id
    }

    /// The owning customer, if any.
    async fn customer(&self, ctx: &Context<'_>) -> Result<Option<Customer>> {
        let Some(id) = self.inner.customer_id else {
            return Ok(None);
        };

        let customer = service::<A, C>(ctx)?
            .customer(id)
            .await
            .map_err(graphql_error)?;
        Ok(customer.map(Customer::from))
    }
}

#[derive(Debug, InputObject)]
pub struct BankAccountInput {
    balance: Option<f64>,
    currency: Option<String>,
    #[graphql(name = "type")]
    account_type: Option<AccountType>,
    customer_id: Option<i64>,
}

impl From<BankAccountInput> for AccountRequest {
    fn from(input: BankAccountInput) -> Self {
        let BankAccountInput {
            balance,
            currency,
            account_type,
            customer_id,
        } = input;

        AccountRequest {
            balance,
            currency,
            account_type: account_type.map(Into::into),
            customer_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[graphql(remote = "crate::domain::AccountType")]
pub enum AccountType {
    CurrentAccount,
    SavingAccount,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct Customer {
    id: i64,
    name: String,
}

impl From<domain::Customer> for Customer {
    fn from(domain::Customer { id, name }: domain::Customer) -> Self {
        Customer { id, name }
    }
}

fn service<'a, A, C>(ctx: &Context<'a>) -> Result<&'a AccountService<A, C>>
where
    A: AccountRepository,
    C: CustomerRepository,
{
    ctx.data::<AccountService<A, C>>()
}

/// Convert a service error into a GraphQL error with a `code` extension.
fn graphql_error(error: domain::Error) -> async_graphql::Error {
    let code = match &error {
        domain::Error::NotFound(_) => "NOT_FOUND",
        domain::Error::InvalidArgument(_) => "INVALID_ARGUMENT",
        domain::Error::Store(_) => {
            error!(error = error.as_chain(), "cannot access store");
            "INTERNAL"
        }
    };

    async_graphql::Error::new(error.to_string()).extend_with(|_, extensions| {
        extensions.set("code", code);
    })
}
