//! Guest management handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::dto::{CreateGuestRequest, GuestDto, ListGuestsParams, UpdateGuestRequest};
use crate::domain::Guest;
use crate::infrastructure::database::entities::{guest, reservation};
use crate::infrastructure::database::mapping::{guest_active, guest_to_domain};
use crate::infrastructure::database::write_err;
use crate::interfaces::http::common::{
    ApiError, ApiResult, ErrorBody, MessageResponse, PaginatedResponse, ValidatedJson,
};

/// Guest handler state
#[derive(Clone)]
pub struct GuestHandlerState {
    pub db: DatabaseConnection,
}

async fn ensure_email_free(db: &DatabaseConnection, email: &str) -> ApiResult<()> {
    let taken = guest::Entity::find()
        .filter(guest::Column::Email.eq(email))
        .count(db)
        .await?;
    if taken > 0 {
        return Err(ApiError::conflict(format!(
            "A guest with email {} already exists",
            email
        )));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/guests",
    tag = "Guests",
    params(ListGuestsParams),
    responses(
        (status = 200, description = "Guest list", body = PaginatedResponse<GuestDto>)
    )
)]
pub async fn list_guests(
    State(state): State<GuestHandlerState>,
    Query(params): Query<ListGuestsParams>,
) -> ApiResult<Json<PaginatedResponse<GuestDto>>> {
    let mut query = guest::Entity::find()
        .order_by_asc(guest::Column::LastName)
        .order_by_asc(guest::Column::FirstName);

    if let Some(q) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(guest::Column::FirstName.contains(q))
                .add(guest::Column::LastName.contains(q))
                .add(guest::Column::Email.contains(q)),
        );
    }

    let page = params.page_request();
    let total = query.clone().count(&state.db).await?;
    let items = query
        .offset(page.offset())
        .limit(page.limit)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|m| GuestDto::from(guest_to_domain(m)))
        .collect();

    Ok(Json(PaginatedResponse::new(items, total, page)))
}

#[utoipa::path(
    get,
    path = "/api/guests/{id}",
    tag = "Guests",
    params(("id" = String, Path, description = "Guest id")),
    responses(
        (status = 200, description = "Guest details", body = GuestDto),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_guest(
    State(state): State<GuestHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<GuestDto>> {
    let model = guest::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Guest"))?;
    Ok(Json(guest_to_domain(model).into()))
}

#[utoipa::path(
    post,
    path = "/api/guests",
    tag = "Guests",
    request_body = CreateGuestRequest,
    responses(
        (status = 201, description = "Created", body = GuestDto),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 422, description = "Validation error", body = ErrorBody)
    )
)]
pub async fn create_guest(
    State(state): State<GuestHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateGuestRequest>,
) -> ApiResult<(StatusCode, Json<GuestDto>)> {
    ensure_email_free(&state.db, &request.email).await?;

    let mut guest = Guest::new(
        request.first_name,
        request.last_name,
        request.email,
        request.phone,
    );
    guest.address = request.address;
    guest.id_number = request.id_number;

    guest::Entity::insert(guest_active(&guest))
        .exec_without_returning(&state.db)
        .await
        .map_err(write_err)?;

    tracing::info!(guest_id = %guest.id, "Guest registered");
    Ok((StatusCode::CREATED, Json(guest.into())))
}

#[utoipa::path(
    put,
    path = "/api/guests/{id}",
    tag = "Guests",
    params(("id" = String, Path, description = "Guest id")),
    request_body = UpdateGuestRequest,
    responses(
        (status = 200, description = "Updated", body = GuestDto),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    )
)]
pub async fn update_guest(
    State(state): State<GuestHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateGuestRequest>,
) -> ApiResult<Json<GuestDto>> {
    let model = guest::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Guest"))?;

    // Lifetime counters are left to check-in.
    let current_email = model.email.clone();
    let mut active: guest::ActiveModel = model.into();
    if let Some(email) = request.email {
        if email != current_email {
            ensure_email_free(&state.db, &email).await?;
            active.email = Set(email);
        }
    }
    if let Some(first_name) = request.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = request.last_name {
        active.last_name = Set(last_name);
    }
    if let Some(phone) = request.phone {
        active.phone = Set(phone);
    }
    if request.address.is_some() {
        active.address = Set(request.address);
    }
    if request.id_number.is_some() {
        active.id_number = Set(request.id_number);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await.map_err(write_err)?;
    Ok(Json(guest_to_domain(updated).into()))
}

#[utoipa::path(
    delete,
    path = "/api/guests/{id}",
    tag = "Guests",
    params(("id" = String, Path, description = "Guest id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 409, description = "Guest has reservations", body = ErrorBody)
    )
)]
pub async fn delete_guest(
    State(state): State<GuestHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let bookings = reservation::Entity::find()
        .filter(reservation::Column::GuestId.eq(id.as_str()))
        .count(&state.db)
        .await?;
    if bookings > 0 {
        return Err(ApiError::conflict(format!(
            "Guest has {} reservation(s) and cannot be deleted",
            bookings
        )));
    }

    let result = guest::Entity::delete_by_id(id.as_str())
        .exec(&state.db)
        .await
        .map_err(write_err)?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("Guest"));
    }

    tracing::info!(guest_id = %id, "Guest deleted");
    Ok(Json(MessageResponse::new("Guest deleted successfully")))
}
