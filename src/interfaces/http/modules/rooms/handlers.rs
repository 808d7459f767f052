//! Room management handlers

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

use super::dto::{CreateRoomRequest, ListRoomsParams, RoomDto, UpdateRoomRequest};
use crate::domain::{Room, RoomStatus, RoomType};
use crate::infrastructure::database::entities::{reservation, room};
use crate::infrastructure::database::mapping::{room_active, room_to_domain};
use crate::infrastructure::database::write_err;
use crate::interfaces::http::common::{
    ApiError, ApiResult, ErrorBody, MessageResponse, PaginatedResponse, ValidatedJson,
};

/// Room handler state
#[derive(Clone)]
pub struct RoomHandlerState {
    pub db: DatabaseConnection,
}

async fn load_room(db: &DatabaseConnection, id: &str) -> ApiResult<Room> {
    let model = room::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("Room"))?;
    Ok(room_to_domain(model)?)
}

async fn ensure_number_free(db: &DatabaseConnection, number: &str) -> ApiResult<()> {
    let taken = room::Entity::find()
        .filter(room::Column::Number.eq(number))
        .count(db)
        .await?;
    if taken > 0 {
        return Err(ApiError::conflict(format!("Room number {} already exists", number)));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/rooms",
    tag = "Rooms",
    params(ListRoomsParams),
    responses(
        (status = 200, description = "Room list", body = PaginatedResponse<RoomDto>),
        (status = 400, description = "Unknown status or room type", body = ErrorBody)
    )
)]
pub async fn list_rooms(
    State(state): State<RoomHandlerState>,
    Query(params): Query<ListRoomsParams>,
) -> ApiResult<Json<PaginatedResponse<RoomDto>>> {
    let mut query = room::Entity::find().order_by_asc(room::Column::Number);

    if let Some(status) = &params.status {
        let status: RoomStatus = status.parse()?;
        query = query.filter(room::Column::Status.eq(status.as_str()));
    }
    if let Some(room_type) = &params.room_type {
        let room_type: RoomType = room_type.parse()?;
        query = query.filter(room::Column::RoomType.eq(room_type.as_str()));
    }
    if let Some(floor) = params.floor {
        query = query.filter(room::Column::Floor.eq(floor));
    }

    let page = params.page_request();
    let total = query.clone().count(&state.db).await?;
    let models = query
        .offset(page.offset())
        .limit(page.limit)
        .all(&state.db)
        .await?;

    let items = models
        .into_iter()
        .map(|m| room_to_domain(m).map(RoomDto::from))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(PaginatedResponse::new(items, total, page)))
}

#[utoipa::path(
    get,
    path = "/api/rooms/{id}",
    tag = "Rooms",
    params(("id" = String, Path, description = "Room id")),
    responses(
        (status = 200, description = "Room details", body = RoomDto),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_room(
    State(state): State<RoomHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<RoomDto>> {
    Ok(Json(load_room(&state.db, &id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/api/rooms",
    tag = "Rooms",
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Created", body = RoomDto),
        (status = 400, description = "Invalid room", body = ErrorBody),
        (status = 409, description = "Room number already exists", body = ErrorBody)
    )
)]
pub async fn create_room(
    State(state): State<RoomHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateRoomRequest>,
) -> ApiResult<(StatusCode, Json<RoomDto>)> {
    let room_type: RoomType = request.room_type.parse()?;
    ensure_number_free(&state.db, &request.number).await?;

    let mut room = Room::new(
        request.number,
        room_type,
        request.floor,
        request.capacity,
        request.price_per_night,
    );
    room.description = request.description;
    if let Some(status) = &request.status {
        room.status = status.parse::<RoomStatus>()?;
    }

    room::Entity::insert(room_active(&room))
        .exec_without_returning(&state.db)
        .await
        .map_err(write_err)?;

    tracing::info!(room_id = %room.id, number = %room.number, "Room created");
    Ok((StatusCode::CREATED, Json(room.into())))
}

#[utoipa::path(
    put,
    path = "/api/rooms/{id}",
    tag = "Rooms",
    params(("id" = String, Path, description = "Room id")),
    request_body = UpdateRoomRequest,
    responses(
        (status = 200, description = "Updated", body = RoomDto),
        (status = 400, description = "Invalid room", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 409, description = "Room number already exists", body = ErrorBody)
    )
)]
pub async fn update_room(
    State(state): State<RoomHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateRoomRequest>,
) -> ApiResult<Json<RoomDto>> {
    let model = room::Entity::find_by_id(id.as_str())
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Room"))?;
    let current = room_to_domain(model.clone())?;
    let mut active: room::ActiveModel = model.into();

    if let Some(number) = request.number {
        if number != current.number {
            ensure_number_free(&state.db, &number).await?;
            active.number = Set(number);
        }
    }
    if let Some(room_type) = &request.room_type {
        let room_type: RoomType = room_type.parse()?;
        active.room_type = Set(room_type.as_str().to_string());
    }
    if let Some(status) = &request.status {
        let status: RoomStatus = status.parse()?;
        if status != current.status {
            tracing::info!(room_id = %id, from = %current.status, to = %status, "Room status set manually");
        }
        active.status = Set(status.as_str().to_string());
    }
    if let Some(floor) = request.floor {
        active.floor = Set(floor);
    }
    if let Some(capacity) = request.capacity {
        active.capacity = Set(capacity);
    }
    if let Some(price) = request.price_per_night {
        active.price_per_night = Set(price);
    }
    if request.description.is_some() {
        active.description = Set(request.description);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await.map_err(write_err)?;
    Ok(Json(room_to_domain(updated)?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/rooms/{id}",
    tag = "Rooms",
    params(("id" = String, Path, description = "Room id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 409, description = "Room has reservations", body = ErrorBody)
    )
)]
pub async fn delete_room(
    State(state): State<RoomHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let bookings = reservation::Entity::find()
        .filter(reservation::Column::RoomId.eq(id.as_str()))
        .count(&state.db)
        .await?;
    if bookings > 0 {
        return Err(ApiError::conflict(format!(
            "Room has {} reservation(s) and cannot be deleted",
            bookings
        )));
    }

    let result = room::Entity::delete_by_id(id.as_str())
        .exec(&state.db)
        .await
        .map_err(write_err)?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("Room"));
    }

    tracing::info!(room_id = %id, "Room deleted");
    Ok(Json(MessageResponse::new("Room deleted successfully")))
}
