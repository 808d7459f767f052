//! Guest DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::Guest;
use crate::shared::PageRequest;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub id_number: Option<String>,
    /// Completed check-ins
    pub total_stays: i32,
    /// Sum of checked-in reservation amounts, minor units
    pub total_spent: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Guest> for GuestDto {
    fn from(g: Guest) -> Self {
        Self {
            id: g.id,
            first_name: g.first_name,
            last_name: g.last_name,
            email: g.email,
            phone: g.phone,
            address: g.address,
            id_number: g.id_number,
            total_stays: g.total_stays,
            total_spent: g.total_spent,
            created_at: g.created_at.to_rfc3339(),
            updated_at: g.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGuestRequest {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub last_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 40, message = "must be 1-40 characters"))]
    pub phone: String,
    pub address: Option<String>,
    pub id_number: Option<String>,
}

/// Contact details only; lifetime counters are maintained by check-in.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateGuestRequest {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub last_name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 40, message = "must be 1-40 characters"))]
    pub phone: Option<String>,
    pub address: Option<String>,
    pub id_number: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListGuestsParams {
    /// Matches first name, last name or email
    pub q: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl ListGuestsParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}
