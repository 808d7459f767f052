//! Account handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::dto::{AccountDto, CreateAccountRequest, ListAccountsParams, UpdateAccountRequest};
use crate::domain::{Account, AccountType};
use crate::infrastructure::database::entities::account;
use crate::infrastructure::database::mapping::{account_active, account_to_domain};
use crate::infrastructure::database::write_err;
use crate::interfaces::http::common::{ApiError, ApiResult, ErrorBody, PaginatedResponse, ValidatedJson};

/// Account handler state
#[derive(Clone)]
pub struct AccountHandlerState {
    pub db: DatabaseConnection,
}

#[utoipa::path(
    get,
    path = "/api/accounts",
    tag = "Ledger",
    params(ListAccountsParams),
    responses(
        (status = 200, description = "Accounts ordered by code", body = PaginatedResponse<AccountDto>)
    )
)]
pub async fn list_accounts(
    State(state): State<AccountHandlerState>,
    Query(params): Query<ListAccountsParams>,
) -> ApiResult<Json<PaginatedResponse<AccountDto>>> {
    let mut query = account::Entity::find().order_by_asc(account::Column::Code);
    if let Some(account_type) = &params.account_type {
        let account_type: AccountType = account_type.parse()?;
        query = query.filter(account::Column::AccountType.eq(account_type.as_str()));
    }

    let page = params.page_request();
    let total = query.clone().count(&state.db).await?;
    let items = query
        .offset(page.offset())
        .limit(page.limit)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|m| account_to_domain(m).map(AccountDto::from))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(PaginatedResponse::new(items, total, page)))
}

#[utoipa::path(
    get,
    path = "/api/accounts/{id}",
    tag = "Ledger",
    params(("id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account with current balance", body = AccountDto),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_account(
    State(state): State<AccountHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AccountDto>> {
    let model = account::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Account"))?;
    Ok(Json(account_to_domain(model)?.into()))
}

#[utoipa::path(
    post,
    path = "/api/accounts",
    tag = "Ledger",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Created with zero balance", body = AccountDto),
        (status = 400, description = "Unknown account type", body = ErrorBody),
        (status = 409, description = "Code already in use", body = ErrorBody)
    )
)]
pub async fn create_account(
    State(state): State<AccountHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateAccountRequest>,
) -> ApiResult<(StatusCode, Json<AccountDto>)> {
    let account_type: AccountType = request.account_type.parse()?;

    let taken = account::Entity::find()
        .filter(account::Column::Code.eq(request.code.as_str()))
        .count(&state.db)
        .await?;
    if taken > 0 {
        return Err(ApiError::conflict(format!(
            "Account code {} already exists",
            request.code
        )));
    }

    let account = Account::new(request.code, request.name, account_type);
    account::Entity::insert(account_active(&account))
        .exec_without_returning(&state.db)
        .await
        .map_err(write_err)?;

    tracing::info!(account_id = %account.id, code = %account.code, "Account created");
    Ok((StatusCode::CREATED, Json(account.into())))
}

#[utoipa::path(
    put,
    path = "/api/accounts/{id}",
    tag = "Ledger",
    params(("id" = String, Path, description = "Account id")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Updated", body = AccountDto),
        (status = 400, description = "Unknown account type or balance in body", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn update_account(
    State(state): State<AccountHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateAccountRequest>,
) -> ApiResult<Json<AccountDto>> {
    let model = account::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Account"))?;

    // Balance belongs to the ledger; write only the edited columns.
    let mut active: account::ActiveModel = model.into();
    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(account_type) = &request.account_type {
        let account_type: AccountType = account_type.parse()?;
        active.account_type = Set(account_type.as_str().to_string());
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await.map_err(write_err)?;
    Ok(Json(account_to_domain(updated)?.into()))
}
