//! Housekeeping task handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use super::dto::{CreateTaskRequest, HousekeepingTaskDto, ListTasksParams, UpdateTaskRequest};
use crate::application::HousekeepingService;
use crate::domain::{HousekeepingTask, TaskPriority, TaskStatus, TaskType};
use crate::infrastructure::database::entities::{housekeeping_task, room};
use crate::infrastructure::database::mapping::{task_active, task_to_domain};
use crate::infrastructure::database::write_err;
use crate::interfaces::http::common::{
    ApiError, ApiResult, ErrorBody, MessageResponse, PaginatedResponse, ValidatedJson,
};

/// Housekeeping handler state
#[derive(Clone)]
pub struct HousekeepingHandlerState {
    pub db: DatabaseConnection,
    pub service: Arc<HousekeepingService>,
}

#[utoipa::path(
    get,
    path = "/api/housekeeping",
    tag = "Housekeeping",
    params(ListTasksParams),
    responses(
        (status = 200, description = "Task list, newest first", body = PaginatedResponse<HousekeepingTaskDto>),
        (status = 400, description = "Unknown filter value", body = ErrorBody)
    )
)]
pub async fn list_tasks(
    State(state): State<HousekeepingHandlerState>,
    Query(params): Query<ListTasksParams>,
) -> ApiResult<Json<PaginatedResponse<HousekeepingTaskDto>>> {
    let mut query =
        housekeeping_task::Entity::find().order_by_desc(housekeeping_task::Column::CreatedAt);

    if let Some(status) = &params.status {
        let status: TaskStatus = status.parse()?;
        query = query.filter(housekeeping_task::Column::Status.eq(status.as_str()));
    }
    if let Some(priority) = &params.priority {
        let priority: TaskPriority = priority.parse()?;
        query = query.filter(housekeeping_task::Column::Priority.eq(priority.as_str()));
    }
    if let Some(task_type) = &params.task_type {
        let task_type: TaskType = task_type.parse()?;
        query = query.filter(housekeeping_task::Column::TaskType.eq(task_type.as_str()));
    }
    if let Some(room_id) = &params.room_id {
        query = query.filter(housekeeping_task::Column::RoomId.eq(room_id.as_str()));
    }

    let page = params.page_request();
    let total = query.clone().count(&state.db).await?;
    let items = query
        .offset(page.offset())
        .limit(page.limit)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|m| task_to_domain(m).map(HousekeepingTaskDto::from))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(PaginatedResponse::new(items, total, page)))
}

#[utoipa::path(
    get,
    path = "/api/housekeeping/{id}",
    tag = "Housekeeping",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task details", body = HousekeepingTaskDto),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_task(
    State(state): State<HousekeepingHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<HousekeepingTaskDto>> {
    let model = housekeeping_task::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Housekeeping task"))?;
    Ok(Json(task_to_domain(model)?.into()))
}

#[utoipa::path(
    post,
    path = "/api/housekeeping",
    tag = "Housekeeping",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Created in status pending", body = HousekeepingTaskDto),
        (status = 400, description = "Unknown task type or priority", body = ErrorBody),
        (status = 404, description = "Room not found", body = ErrorBody)
    )
)]
pub async fn create_task(
    State(state): State<HousekeepingHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<HousekeepingTaskDto>)> {
    let task_type: TaskType = request.task_type.parse()?;
    let priority = match &request.priority {
        Some(p) => p.parse::<TaskPriority>()?,
        None => TaskPriority::default(),
    };

    if room::Entity::find_by_id(request.room_id.as_str())
        .one(&state.db)
        .await?
        .is_none()
    {
        return Err(ApiError::not_found("Room"));
    }

    let mut task = HousekeepingTask::new(request.room_id, task_type, priority);
    task.assigned_to = request.assigned_to;
    task.notes = request.notes;
    task.scheduled_for = request.scheduled_for;

    housekeeping_task::Entity::insert(task_active(&task))
        .exec_without_returning(&state.db)
        .await
        .map_err(write_err)?;

    tracing::info!(task_id = %task.id, room_id = %task.room_id, task_type = task_type.as_str(), "Housekeeping task created");
    Ok((StatusCode::CREATED, Json(task.into())))
}

#[utoipa::path(
    put,
    path = "/api/housekeeping/{id}",
    tag = "Housekeeping",
    params(("id" = String, Path, description = "Task id")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Updated", body = HousekeepingTaskDto),
        (status = 400, description = "Invalid change", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn update_task(
    State(state): State<HousekeepingHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateTaskRequest>,
) -> ApiResult<Json<HousekeepingTaskDto>> {
    let changes = request.into_changes()?;
    Ok(Json(state.service.update(&id, changes).await?.into()))
}

#[utoipa::path(
    post,
    path = "/api/housekeeping/{id}/complete",
    tag = "Housekeeping",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Completed; cleaning tasks stamp the room's lastCleaned", body = HousekeepingTaskDto),
        (status = 400, description = "Already completed", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn complete_task(
    State(state): State<HousekeepingHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<HousekeepingTaskDto>> {
    Ok(Json(state.service.complete(&id).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/housekeeping/{id}",
    tag = "Housekeeping",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn delete_task(
    State(state): State<HousekeepingHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let result = housekeeping_task::Entity::delete_by_id(id.as_str())
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("Housekeeping task"));
    }
    Ok(Json(MessageResponse::new("Housekeeping task deleted successfully")))
}
