//! Room DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::Room;
use crate::shared::PageRequest;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub id: String,
    pub number: String,
    /// single, double, twin, suite, deluxe
    pub room_type: String,
    pub floor: i32,
    pub capacity: i32,
    pub price_per_night: i64,
    pub description: Option<String>,
    /// available, occupied, cleaning, maintenance
    pub status: String,
    pub last_cleaned: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Room> for RoomDto {
    fn from(r: Room) -> Self {
        Self {
            id: r.id,
            number: r.number,
            room_type: r.room_type.to_string(),
            floor: r.floor,
            capacity: r.capacity,
            price_per_night: r.price_per_night,
            description: r.description,
            status: r.status.to_string(),
            last_cleaned: r.last_cleaned.map(|d| d.to_rfc3339()),
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 20, message = "must be 1-20 characters"))]
    pub number: String,
    pub room_type: String,
    pub floor: i32,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub capacity: i32,
    #[validate(range(min = 0, message = "cannot be negative"))]
    pub price_per_night: i64,
    pub description: Option<String>,
    /// Defaults to available
    pub status: Option<String>,
}

/// Administrative edit. Any status may be set here.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoomRequest {
    #[validate(length(min = 1, max = 20, message = "must be 1-20 characters"))]
    pub number: Option<String>,
    pub room_type: Option<String>,
    pub floor: Option<i32>,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub capacity: Option<i32>,
    #[validate(range(min = 0, message = "cannot be negative"))]
    pub price_per_night: Option<i64>,
    pub description: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListRoomsParams {
    pub status: Option<String>,
    pub room_type: Option<String>,
    pub floor: Option<i32>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl ListRoomsParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}
