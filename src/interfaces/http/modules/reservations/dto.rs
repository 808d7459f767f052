//! Reservation DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{NewReservation, ReservationChanges, ReservationDetails, ReservationStatus};
use crate::interfaces::http::modules::guests::GuestDto;
use crate::interfaces::http::modules::rooms::RoomDto;
use crate::shared::{DomainResult, PageRequest};

/// Reservation joined with its guest and room
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDto {
    pub id: String,
    pub guest_id: String,
    pub room_id: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub nights: i64,
    pub adults: i32,
    pub children: i32,
    /// confirmed, checked-in, checked-out, cancelled
    pub status: String,
    /// Minor currency units
    pub total_amount: i64,
    pub special_requests: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    /// Absent when the guest record no longer exists
    pub guest: Option<GuestDto>,
    /// Absent when the room record no longer exists
    pub room: Option<RoomDto>,
}

impl From<ReservationDetails> for ReservationDto {
    fn from(d: ReservationDetails) -> Self {
        let r = d.reservation;
        Self {
            nights: r.nights(),
            id: r.id,
            guest_id: r.guest_id,
            room_id: r.room_id,
            check_in_date: r.check_in_date,
            check_out_date: r.check_out_date,
            adults: r.adults,
            children: r.children,
            status: r.status.to_string(),
            total_amount: r.total_amount,
            special_requests: r.special_requests,
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
            guest: d.guest.map(GuestDto::from),
            room: d.room.map(RoomDto::from),
        }
    }
}

/// Result of a check-in or check-out
#[derive(Debug, Serialize, ToSchema)]
pub struct TransitionResponse {
    pub message: String,
    pub reservation: ReservationDto,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub guest_id: String,
    #[validate(length(min = 1, message = "is required"))]
    pub room_id: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    #[serde(default = "default_adults")]
    pub adults: i32,
    #[serde(default)]
    pub children: i32,
    /// Precomputed stay price, minor units
    pub total_amount: i64,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub special_requests: Option<String>,
}

fn default_adults() -> i32 {
    1
}

impl From<CreateReservationRequest> for NewReservation {
    fn from(r: CreateReservationRequest) -> Self {
        Self {
            guest_id: r.guest_id,
            room_id: r.room_id,
            check_in_date: r.check_in_date,
            check_out_date: r.check_out_date,
            adults: r.adults,
            children: r.children,
            total_amount: r.total_amount,
            special_requests: r.special_requests,
        }
    }
}

/// Administrative edit. Guest, room and amount cannot be changed, and a
/// status set here bypasses the check-in / check-out side effects.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateReservationRequest {
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
    pub adults: Option<i32>,
    pub children: Option<i32>,
    pub status: Option<String>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub special_requests: Option<String>,
}

impl UpdateReservationRequest {
    pub fn into_changes(self) -> DomainResult<ReservationChanges> {
        Ok(ReservationChanges {
            check_in_date: self.check_in_date,
            check_out_date: self.check_out_date,
            adults: self.adults,
            children: self.children,
            status: self.status.as_deref().map(str::parse::<ReservationStatus>).transpose()?,
            special_requests: self.special_requests,
        })
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListReservationsParams {
    pub status: Option<String>,
    pub guest_id: Option<String>,
    pub room_id: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl ListReservationsParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}
