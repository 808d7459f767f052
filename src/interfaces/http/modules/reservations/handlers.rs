//! Reservation handlers
//!
//! Reads for lists go straight to the database; every write and the
//! check-in / check-out transitions go through [`ReservationLifecycle`].

use std::collections::{HashMap, HashSet};
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

use super::dto::{
    CreateReservationRequest, ListReservationsParams, ReservationDto, TransitionResponse,
    UpdateReservationRequest,
};
use crate::application::ReservationLifecycle;
use crate::domain::{ReservationDetails, ReservationStatus};
use crate::infrastructure::database::entities::{guest, reservation, room};
use crate::infrastructure::database::mapping::{guest_to_domain, reservation_to_domain, room_to_domain};
use crate::interfaces::http::common::{
    ApiResult, ErrorBody, MessageResponse, PaginatedResponse, ValidatedJson,
};

/// Reservation handler state
#[derive(Clone)]
pub struct ReservationHandlerState {
    pub db: DatabaseConnection,
    pub lifecycle: Arc<ReservationLifecycle>,
}

#[utoipa::path(
    get,
    path = "/api/reservations",
    tag = "Reservations",
    params(ListReservationsParams),
    responses(
        (status = 200, description = "Reservation list, newest first", body = PaginatedResponse<ReservationDto>),
        (status = 400, description = "Unknown status", body = ErrorBody)
    )
)]
pub async fn list_reservations(
    State(state): State<ReservationHandlerState>,
    Query(params): Query<ListReservationsParams>,
) -> ApiResult<Json<PaginatedResponse<ReservationDto>>> {
    let mut query = reservation::Entity::find().order_by_desc(reservation::Column::CreatedAt);

    if let Some(status) = &params.status {
        let status: ReservationStatus = status.parse()?;
        query = query.filter(reservation::Column::Status.eq(status.as_str()));
    }
    if let Some(guest_id) = &params.guest_id {
        query = query.filter(reservation::Column::GuestId.eq(guest_id.as_str()));
    }
    if let Some(room_id) = &params.room_id {
        query = query.filter(reservation::Column::RoomId.eq(room_id.as_str()));
    }

    let page = params.page_request();
    let total = query.clone().count(&state.db).await?;
    let models = query
        .offset(page.offset())
        .limit(page.limit)
        .all(&state.db)
        .await?;

    // One lookup per related table for the whole page.
    let guest_ids: HashSet<String> = models.iter().map(|m| m.guest_id.clone()).collect();
    let room_ids: HashSet<String> = models.iter().map(|m| m.room_id.clone()).collect();

    let guests: HashMap<String, _> = guest::Entity::find()
        .filter(guest::Column::Id.is_in(guest_ids))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|m| (m.id.clone(), guest_to_domain(m)))
        .collect();
    let mut rooms = HashMap::new();
    for m in room::Entity::find()
        .filter(room::Column::Id.is_in(room_ids))
        .all(&state.db)
        .await?
    {
        rooms.insert(m.id.clone(), room_to_domain(m)?);
    }

    let mut items = Vec::with_capacity(models.len());
    for m in models {
        let reservation = reservation_to_domain(m)?;
        // Guests and rooms may be shared by several rows of the page.
        let guest = guests.get(&reservation.guest_id).cloned();
        let room = rooms.get(&reservation.room_id).cloned();
        items.push(ReservationDto::from(ReservationDetails {
            reservation,
            guest,
            room,
        }));
    }

    Ok(Json(PaginatedResponse::new(items, total, page)))
}

#[utoipa::path(
    get,
    path = "/api/reservations/{id}",
    tag = "Reservations",
    params(("id" = String, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Reservation with guest and room", body = ReservationDto),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ReservationDto>> {
    Ok(Json(state.lifecycle.get(&id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/api/reservations",
    tag = "Reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Created in status confirmed", body = ReservationDto),
        (status = 400, description = "Invalid stay", body = ErrorBody),
        (status = 404, description = "Guest or room not found", body = ErrorBody)
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> ApiResult<(StatusCode, Json<ReservationDto>)> {
    let details = state.lifecycle.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(details.into())))
}

#[utoipa::path(
    put,
    path = "/api/reservations/{id}",
    tag = "Reservations",
    params(("id" = String, Path, description = "Reservation id")),
    request_body = UpdateReservationRequest,
    responses(
        (status = 200, description = "Updated; no room or guest side effects", body = ReservationDto),
        (status = 400, description = "Invalid change", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn update_reservation(
    State(state): State<ReservationHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateReservationRequest>,
) -> ApiResult<Json<ReservationDto>> {
    let changes = request.into_changes()?;
    Ok(Json(state.lifecycle.update(&id, changes).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/reservations/{id}",
    tag = "Reservations",
    params(("id" = String, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn delete_reservation(
    State(state): State<ReservationHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.lifecycle.delete(&id).await?;
    Ok(Json(MessageResponse::new("Reservation deleted successfully")))
}

#[utoipa::path(
    post,
    path = "/api/reservations/check-in/{id}",
    tag = "Reservations",
    params(("id" = String, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Guest checked in, room occupied", body = TransitionResponse),
        (status = 400, description = "Reservation is not confirmed", body = ErrorBody),
        (status = 404, description = "Reservation, room or guest not found", body = ErrorBody)
    )
)]
pub async fn check_in(
    State(state): State<ReservationHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TransitionResponse>> {
    let details = state.lifecycle.check_in(&id).await?;
    Ok(Json(TransitionResponse {
        message: "Guest checked in successfully".to_string(),
        reservation: details.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/reservations/check-out/{id}",
    tag = "Reservations",
    params(("id" = String, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Guest checked out, cleaning task created", body = TransitionResponse),
        (status = 400, description = "Reservation is not checked in", body = ErrorBody),
        (status = 404, description = "Reservation or room not found", body = ErrorBody)
    )
)]
pub async fn check_out(
    State(state): State<ReservationHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TransitionResponse>> {
    let details = state.lifecycle.check_out(&id).await?;
    Ok(Json(TransitionResponse {
        message: "Guest checked out successfully".to_string(),
        reservation: details.into(),
    }))
}
