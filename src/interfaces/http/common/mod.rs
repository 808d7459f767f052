//! Shared HTTP building blocks

pub mod error;
pub mod pagination;
pub mod validated_json;

pub use error::{ApiError, ApiResult, ErrorBody, MessageResponse};
pub use pagination::{PaginatedResponse, PaginationParams};
pub use validated_json::ValidatedJson;
