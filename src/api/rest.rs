use crate::{
    api::AppState,
    domain::{
        self, AccountProjection, AccountRepository, AccountRequest, AccountResponse, AccountType,
        CustomerRepository,
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use error_ext::StdErrorExt;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{IntoParams, OpenApi, ToSchema};

const ACCOUNT_API_GROUP: &str = "bank accounts";

#[derive(OpenApi)]
#[openapi(
    paths(list_accounts, get_account, create_account, update_account, delete_account),
    components(schemas(
        AccountRequest,
        AccountResponse,
        AccountProjection,
        AccountType,
        Projection,
        ErrorResponse
    ))
)]
pub struct ApiDoc;

pub fn app<A, C>() -> Router<AppState<A, C>>
where
    A: AccountRepository,
    C: CustomerRepository,
{
    Router::new()
        .route(
            "/bankAccounts",
            get(list_accounts::<A, C>).post(create_account::<A, C>),
        )
        .route(
            "/bankAccounts/:id",
            get(get_account::<A, C>)
                .put(update_account::<A, C>)
                .delete(delete_account::<A, C>),
        )
}

#[utoipa::path(
    get,
    path = "/api/bankAccounts",
    tag = ACCOUNT_API_GROUP,
    params(ProjectionParams),
    responses(
        (status = 200, description = "All accounts, projected if requested", body = [AccountResponse]),
    )
)]
async fn list_accounts<A, C>(
    State(app_state): State<AppState<A, C>>,
    Query(ProjectionParams { projection }): Query<ProjectionParams>,
) -> Result<Json<Vec<AccountView>>, Error>
where
    A: AccountRepository,
    C: CustomerRepository,
{
    let accounts = app_state.account_service.list_accounts().await?;
    let accounts = accounts
        .into_iter()
        .map(|account| AccountView::new(account, projection))
        .collect();
    Ok(Json(accounts))
}

#[utoipa::path(
    get,
    path = "/api/bankAccounts/{id}",
    tag = ACCOUNT_API_GROUP,
    params(("id" = String, Path, description = "Account ID"), ProjectionParams),
    responses(
        (status = 200, description = "Account found, projected if requested", body = AccountResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
    )
)]
async fn get_account<A, C>(
    State(app_state): State<AppState<A, C>>,
    Path(id): Path<String>,
    Query(ProjectionParams { projection }): Query<ProjectionParams>,
) -> Result<Json<AccountView>, Error>
where
    A: AccountRepository,
    C: CustomerRepository,
{
    let account = app_state.account_service.get_account(&id).await?;
    Ok(Json(AccountView::new(account, projection)))
}

#[utoipa::path(
    post,
    path = "/api/bankAccounts",
    tag = ACCOUNT_API_GROUP,
    request_body = AccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Account type missing", body = ErrorResponse),
    )
)]
async fn create_account<A, C>(
    State(app_state): State<AppState<A, C>>,
    Json(request): Json<AccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), Error>
where
    A: AccountRepository,
    C: CustomerRepository,
{
    let account = app_state.account_service.add_account(request).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

#[utoipa::path(
    put,
    path = "/api/bankAccounts/{id}",
    tag = ACCOUNT_API_GROUP,
    params(("id" = String, Path, description = "Account ID")),
    request_body = AccountRequest,
    responses(
        (status = 200, description = "Account updated", body = AccountResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
    )
)]
async fn update_account<A, C>(
    State(app_state): State<AppState<A, C>>,
    Path(id): Path<String>,
    Json(request): Json<AccountRequest>,
) -> Result<Json<AccountResponse>, Error>
where
    A: AccountRepository,
    C: CustomerRepository,
{
    let account = app_state
        .account_service
        .update_account(&id, request)
        .await?;
    Ok(Json(account))
}

#[utoipa::path(
    delete,
    path = "/api/bankAccounts/{id}",
    tag = ACCOUNT_API_GROUP,
    params(("id" = String, Path, description = "Account ID")),
    responses(
        (status = 204, description = "Account deleted or not existing"),
    )
)]
async fn delete_account<A, C>(
    State(app_state): State<AppState<A, C>>,
    Path(id): Path<String>,
) -> Result<StatusCode, Error>
where
    A: AccountRepository,
    C: CustomerRepository,
{
    app_state.account_service.delete_account(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
struct ProjectionParams {
    /// Named projection to apply; `p1` selects only `id` and `type`.
    projection: Option<Projection>,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
enum Projection {
    P1,
}

/// An account as rendered by the read endpoints: complete or projected.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum AccountView {
    Full(AccountResponse),
    P1(AccountProjection),
}

impl AccountView {
    fn new(account: AccountResponse, projection: Option<Projection>) -> Self {
        match projection {
            None => AccountView::Full(account),
            Some(Projection::P1) => AccountView::P1(account.into()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    error: String,
}

/// Service error rendered as HTTP response.
#[derive(Debug)]
struct Error(domain::Error);

impl From<domain::Error> for Error {
    fn from(error: domain::Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            domain::Error::NotFound(_) => StatusCode::NOT_FOUND,
            domain::Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            domain::Error::Store(_) => {
                error!(error = self.0.as_chain(), "cannot access store");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
