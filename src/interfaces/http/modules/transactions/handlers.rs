//! Financial transaction handlers
//!
//! Every write goes through [`LedgerService`] so account balances move in
//! the same unit of work as the transaction row.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use super::dto::{
    CreateTransactionRequest, ListTransactionsParams, TransactionDto, UpdateTransactionRequest,
};
use crate::application::LedgerService;
use crate::domain::TransactionStatus;
use crate::infrastructure::database::entities::financial_transaction;
use crate::infrastructure::database::mapping::transaction_to_domain;
use crate::interfaces::http::common::{
    ApiError, ApiResult, ErrorBody, MessageResponse, PaginatedResponse, ValidatedJson,
};

/// Transaction handler state
#[derive(Clone)]
pub struct TransactionHandlerState {
    pub db: DatabaseConnection,
    pub ledger: Arc<LedgerService>,
}

#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "Ledger",
    params(ListTransactionsParams),
    responses(
        (status = 200, description = "Transactions, most recent date first", body = PaginatedResponse<TransactionDto>),
        (status = 400, description = "Unknown status", body = ErrorBody)
    )
)]
pub async fn list_transactions(
    State(state): State<TransactionHandlerState>,
    Query(params): Query<ListTransactionsParams>,
) -> ApiResult<Json<PaginatedResponse<TransactionDto>>> {
    let mut query = financial_transaction::Entity::find()
        .order_by_desc(financial_transaction::Column::TransactionDate)
        .order_by_desc(financial_transaction::Column::CreatedAt);

    if let Some(account_id) = &params.account_id {
        query = query.filter(
            Condition::any()
                .add(financial_transaction::Column::AccountId.eq(account_id.as_str()))
                .add(financial_transaction::Column::CounterAccountId.eq(account_id.as_str())),
        );
    }
    if let Some(status) = &params.status {
        let status: TransactionStatus = status.parse()?;
        query = query.filter(financial_transaction::Column::Status.eq(status.as_str()));
    }

    let page = params.page_request();
    let total = query.clone().count(&state.db).await?;
    let items = query
        .offset(page.offset())
        .limit(page.limit)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|m| transaction_to_domain(m).map(TransactionDto::from))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(PaginatedResponse::new(items, total, page)))
}

#[utoipa::path(
    get,
    path = "/api/transactions/{id}",
    tag = "Ledger",
    params(("id" = String, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Transaction details", body = TransactionDto),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_transaction(
    State(state): State<TransactionHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TransactionDto>> {
    let model = financial_transaction::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Transaction"))?;
    Ok(Json(transaction_to_domain(model)?.into()))
}

#[utoipa::path(
    post,
    path = "/api/transactions",
    tag = "Ledger",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Recorded; completed transactions post immediately", body = TransactionDto),
        (status = 400, description = "Invalid transaction", body = ErrorBody),
        (status = 404, description = "Account not found", body = ErrorBody)
    )
)]
pub async fn create_transaction(
    State(state): State<TransactionHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateTransactionRequest>,
) -> ApiResult<(StatusCode, Json<TransactionDto>)> {
    let txn = state.ledger.record(request.into_new()?).await?;
    Ok((StatusCode::CREATED, Json(txn.into())))
}

#[utoipa::path(
    put,
    path = "/api/transactions/{id}",
    tag = "Ledger",
    params(("id" = String, Path, description = "Transaction id")),
    request_body = UpdateTransactionRequest,
    responses(
        (status = 200, description = "Updated; balances re-posted as needed", body = TransactionDto),
        (status = 400, description = "Invalid change", body = ErrorBody),
        (status = 404, description = "Transaction or account not found", body = ErrorBody)
    )
)]
pub async fn update_transaction(
    State(state): State<TransactionHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateTransactionRequest>,
) -> ApiResult<Json<TransactionDto>> {
    let changes = request.into_changes()?;
    Ok(Json(state.ledger.update(&id, changes).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/transactions/{id}",
    tag = "Ledger",
    params(("id" = String, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Deleted; a completed transaction is reversed", body = MessageResponse),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn delete_transaction(
    State(state): State<TransactionHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.ledger.delete(&id).await?;
    Ok(Json(MessageResponse::new("Transaction deleted successfully")))
}
