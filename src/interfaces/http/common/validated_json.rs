//! Validated JSON request bodies
//!
//! `ValidatedJson<T>` deserializes the body like `axum::Json<T>` and then runs
//! `validator::Validate`. Failures leave as the usual `{error}` payload:
//!
//! - malformed JSON, wrong types, or a field the DTO does not accept
//!   (update DTOs deny unknown fields, so `totalStays` or `balance` land
//!   here): 400 `Invalid JSON: ...`
//! - validator rules: 422 with `field: message` pairs sorted by field

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiError;

/// Request body that passed both deserialization and its `validator` rules.
///
/// ```ignore
/// pub async fn create_room(
///     State(state): State<RoomHandlerState>,
///     ValidatedJson(request): ValidatedJson<CreateRoomRequest>,
/// ) -> ApiResult<(StatusCode, Json<RoomDto>)>
/// ```
pub struct ValidatedJson<T>(pub T);

fn json_rejection(rejection: JsonRejection) -> ApiError {
    ApiError::bad_request(format!("Invalid JSON: {}", rejection.body_text()))
}

fn validation_rejection(errors: ValidationErrors) -> ApiError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let messages: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: invalid ({})", field, e.code),
            })
        })
        .collect();

    let message = if messages.is_empty() {
        "Validation failed".to_string()
    } else {
        messages.join("; ")
    };
    ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, message)
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate().map_err(validation_rejection)?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::http::modules::guests::UpdateGuestRequest;
    use crate::interfaces::http::modules::rooms::CreateRoomRequest;
    use axum::body::Body;
    use axum::routing::post;
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn accept_room(ValidatedJson(room): ValidatedJson<CreateRoomRequest>) -> String {
        room.number
    }

    async fn accept_guest(ValidatedJson(_): ValidatedJson<UpdateGuestRequest>) -> &'static str {
        "ok"
    }

    async fn post_json(uri: &str, body: String) -> (StatusCode, String) {
        let app = Router::new()
            .route("/rooms", post(accept_room))
            .route("/guests", post(accept_guest));
        let req = axum::http::Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn error_of(body: &str) -> String {
        let json: Value = serde_json::from_str(body).unwrap();
        json["error"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn valid_room_passes_through() {
        let body = json!({"number": "101", "roomType": "double", "floor": 1, "capacity": 2, "pricePerNight": 150});
        let (status, text) = post_json("/rooms", body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "101");
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let (status, body) = post_json("/rooms", "{\"number\": ".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_of(&body).starts_with("Invalid JSON"));
    }

    #[tokio::test]
    async fn unknown_field_on_update_is_400() {
        let (status, body) = post_json("/guests", json!({"totalStays": 9}).to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_of(&body).contains("totalStays"));
    }

    #[tokio::test]
    async fn rule_violations_are_422_sorted_by_field() {
        let body = json!({"number": "", "roomType": "double", "floor": 1, "capacity": 0, "pricePerNight": -1});
        let (status, body) = post_json("/rooms", body.to_string()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            error_of(&body),
            "capacity: must be at least 1; number: must be 1-20 characters; price_per_night: cannot be negative"
        );
    }
}
