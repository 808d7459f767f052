//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ErrorBody, MessageResponse, PaginatedResponse};
use super::modules::{
    accounts, guests, health, housekeeping, metrics, reservations, rooms, transactions,
};
use crate::application::{HousekeepingService, LedgerService, ReservationLifecycle};
use crate::domain::UnitOfWork;
use crate::infrastructure::SeaOrmUnitOfWork;

/// State shared by every route. Each handler extracts its own slice of it
/// through `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub db: DatabaseConnection,
    pub lifecycle: Arc<ReservationLifecycle>,
    pub housekeeping: Arc<HousekeepingService>,
    pub ledger: Arc<LedgerService>,
    pub metrics: PrometheusHandle,
    pub started_at: Arc<Instant>,
}

impl ApiState {
    pub fn new(db: DatabaseConnection, metrics: PrometheusHandle) -> Self {
        let uow: Arc<dyn UnitOfWork> = Arc::new(SeaOrmUnitOfWork::new(db.clone()));
        Self {
            lifecycle: Arc::new(ReservationLifecycle::new(uow.clone())),
            housekeeping: Arc::new(HousekeepingService::new(uow.clone())),
            ledger: Arc::new(LedgerService::new(uow)),
            db,
            metrics,
            started_at: Arc::new(Instant::now()),
        }
    }
}

impl FromRef<ApiState> for rooms::RoomHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        Self { db: s.db.clone() }
    }
}

impl FromRef<ApiState> for guests::GuestHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        Self { db: s.db.clone() }
    }
}

impl FromRef<ApiState> for reservations::ReservationHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        Self {
            db: s.db.clone(),
            lifecycle: Arc::clone(&s.lifecycle),
        }
    }
}

impl FromRef<ApiState> for housekeeping::HousekeepingHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        Self {
            db: s.db.clone(),
            service: Arc::clone(&s.housekeeping),
        }
    }
}

impl FromRef<ApiState> for accounts::AccountHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        Self { db: s.db.clone() }
    }
}

impl FromRef<ApiState> for transactions::TransactionHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        Self {
            db: s.db.clone(),
            ledger: Arc::clone(&s.ledger),
        }
    }
}

impl FromRef<ApiState> for health::HealthState {
    fn from_ref(s: &ApiState) -> Self {
        Self {
            db: s.db.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

impl FromRef<ApiState> for metrics::MetricsState {
    fn from_ref(s: &ApiState) -> Self {
        Self {
            handle: s.metrics.clone(),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Rooms
        rooms::list_rooms,
        rooms::get_room,
        rooms::create_room,
        rooms::update_room,
        rooms::delete_room,
        // Guests
        guests::list_guests,
        guests::get_guest,
        guests::create_guest,
        guests::update_guest,
        guests::delete_guest,
        // Reservations
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::create_reservation,
        reservations::update_reservation,
        reservations::delete_reservation,
        reservations::check_in,
        reservations::check_out,
        // Housekeeping
        housekeeping::list_tasks,
        housekeeping::get_task,
        housekeeping::create_task,
        housekeeping::update_task,
        housekeeping::complete_task,
        housekeeping::delete_task,
        // Ledger
        accounts::list_accounts,
        accounts::get_account,
        accounts::create_account,
        accounts::update_account,
        transactions::list_transactions,
        transactions::get_transaction,
        transactions::create_transaction,
        transactions::update_transaction,
        transactions::delete_transaction,
    ),
    components(
        schemas(
            // Common
            ErrorBody,
            MessageResponse,
            PaginatedResponse<rooms::RoomDto>,
            PaginatedResponse<guests::GuestDto>,
            PaginatedResponse<reservations::ReservationDto>,
            PaginatedResponse<housekeeping::HousekeepingTaskDto>,
            PaginatedResponse<accounts::AccountDto>,
            PaginatedResponse<transactions::TransactionDto>,
            health::HealthResponse,
            health::ComponentHealth,
            // Rooms
            rooms::RoomDto,
            rooms::CreateRoomRequest,
            rooms::UpdateRoomRequest,
            // Guests
            guests::GuestDto,
            guests::CreateGuestRequest,
            guests::UpdateGuestRequest,
            // Reservations
            reservations::ReservationDto,
            reservations::TransitionResponse,
            reservations::CreateReservationRequest,
            reservations::UpdateReservationRequest,
            // Housekeeping
            housekeeping::HousekeepingTaskDto,
            housekeeping::CreateTaskRequest,
            housekeeping::UpdateTaskRequest,
            // Ledger
            accounts::AccountDto,
            accounts::CreateAccountRequest,
            accounts::UpdateAccountRequest,
            transactions::TransactionDto,
            transactions::CreateTransactionRequest,
            transactions::UpdateTransactionRequest,
        )
    ),
    tags(
        (name = "Health", description = "Service and database health"),
        (name = "Rooms", description = "Room inventory"),
        (name = "Guests", description = "Guest registry"),
        (name = "Reservations", description = "Bookings and the check-in / check-out lifecycle"),
        (name = "Housekeeping", description = "Cleaning, maintenance and inspection tasks"),
        (name = "Ledger", description = "Accounts and financial transactions"),
    ),
    info(
        title = "Hotel Back Office API",
        version = "1.0.0",
        description = "Rooms, guests, reservations, housekeeping and a lightweight ledger"
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(db: DatabaseConnection, metrics_handle: PrometheusHandle) -> Router {
    let state = ApiState::new(db, metrics_handle);

    let room_routes = Router::new()
        .route("/", get(rooms::list_rooms).post(rooms::create_room))
        .route(
            "/{id}",
            get(rooms::get_room)
                .put(rooms::update_room)
                .delete(rooms::delete_room),
        );

    let guest_routes = Router::new()
        .route("/", get(guests::list_guests).post(guests::create_guest))
        .route(
            "/{id}",
            get(guests::get_guest)
                .put(guests::update_guest)
                .delete(guests::delete_guest),
        );

    let reservation_routes = Router::new()
        .route(
            "/",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route("/check-in/{id}", post(reservations::check_in))
        .route("/check-out/{id}", post(reservations::check_out))
        .route(
            "/{id}",
            get(reservations::get_reservation)
                .put(reservations::update_reservation)
                .delete(reservations::delete_reservation),
        );

    let housekeeping_routes = Router::new()
        .route("/", get(housekeeping::list_tasks).post(housekeeping::create_task))
        .route(
            "/{id}",
            get(housekeeping::get_task)
                .put(housekeeping::update_task)
                .delete(housekeeping::delete_task),
        )
        .route("/{id}/complete", post(housekeeping::complete_task));

    let account_routes = Router::new()
        .route("/", get(accounts::list_accounts).post(accounts::create_account))
        .route(
            "/{id}",
            get(accounts::get_account).put(accounts::update_account),
        );

    let transaction_routes = Router::new()
        .route(
            "/",
            get(transactions::list_transactions).post(transactions::create_transaction),
        )
        .route(
            "/{id}",
            get(transactions::get_transaction)
                .put(transactions::update_transaction)
                .delete(transactions::delete_transaction),
        );

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        .nest("/api/rooms", room_routes)
        .nest("/api/guests", guest_routes)
        .nest("/api/reservations", reservation_routes)
        .nest("/api/housekeeping", housekeeping_routes)
        .nest("/api/accounts", account_routes)
        .nest("/api/transactions", transaction_routes)
        .with_state(state)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::infrastructure::database::test_connection;

    async fn app() -> Router {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        create_api_router(test_connection().await, handle)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&b).unwrap())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn create(app: &Router, uri: &str, body: Value) -> Value {
        let (status, json) = send(app, "POST", uri, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{uri}: {json}");
        json
    }

    /// Guest, room and a confirmed 3-night reservation worth 450.
    async fn booked(app: &Router) -> (String, String, String) {
        let guest = create(
            app,
            "/api/guests",
            json!({"firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com", "phone": "+44 20 0000"}),
        )
        .await;
        let room = create(
            app,
            "/api/rooms",
            json!({"number": "101", "roomType": "double", "floor": 1, "capacity": 2, "pricePerNight": 150}),
        )
        .await;
        let reservation = create(
            app,
            "/api/reservations",
            json!({
                "guestId": guest["id"],
                "roomId": room["id"],
                "checkInDate": "2026-03-01",
                "checkOutDate": "2026-03-04",
                "adults": 2,
                "totalAmount": 450
            }),
        )
        .await;
        assert_eq!(reservation["status"], "confirmed");
        assert_eq!(reservation["guest"]["email"], "ada@example.com");

        let id = |v: &Value| v["id"].as_str().unwrap().to_string();
        (id(&guest), id(&room), id(&reservation))
    }

    #[tokio::test]
    async fn stay_lifecycle_over_http() {
        let app = app().await;
        let (guest_id, room_id, res_id) = booked(&app).await;

        let (status, body) = send(&app, "POST", &format!("/api/reservations/check-in/{res_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Guest checked in successfully");
        assert_eq!(body["reservation"]["status"], "checked-in");
        assert_eq!(body["reservation"]["room"]["status"], "occupied");
        assert_eq!(body["reservation"]["guest"]["totalStays"], 1);
        assert_eq!(body["reservation"]["guest"]["totalSpent"], 450);

        let (status, body) = send(&app, "POST", &format!("/api/reservations/check-in/{res_id}"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Reservation must be confirmed to check in (current status: checked-in)"
        );

        let (status, body) = send(&app, "POST", &format!("/api/reservations/check-out/{res_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reservation"]["status"], "checked-out");
        assert_eq!(body["reservation"]["room"]["status"], "cleaning");

        let (_, guest) = send(&app, "GET", &format!("/api/guests/{guest_id}"), None).await;
        assert_eq!(guest["totalStays"], 1);
        assert_eq!(guest["totalSpent"], 450);

        let (status, tasks) = send(&app, "GET", &format!("/api/housekeeping?roomId={room_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tasks["total"], 1);
        let task = &tasks["items"][0];
        assert_eq!(task["taskType"], "cleaning");
        assert_eq!(task["status"], "pending");
        assert_eq!(task["priority"], "high");
        assert_eq!(task["notes"], "post-checkout cleaning");

        let task_id = task["id"].as_str().unwrap();
        let (status, done) = send(&app, "POST", &format!("/api/housekeeping/{task_id}/complete"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(done["status"], "completed");

        let (_, room) = send(&app, "GET", &format!("/api/rooms/{room_id}"), None).await;
        assert!(room["lastCleaned"].is_string());
        assert_eq!(room["status"], "cleaning");

        let (status, _) = send(&app, "POST", &format!("/api/housekeeping/{task_id}/complete"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_reservation_is_404_with_error_body() {
        let app = app().await;
        for uri in [
            "/api/reservations/check-in/nope",
            "/api/reservations/check-out/nope",
        ] {
            let (status, body) = send(&app, "POST", uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["error"], "Reservation not found");
        }
        let (status, _) = send(&app, "DELETE", "/api/reservations/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_rejects_immutable_fields_and_skips_side_effects() {
        let app = app().await;
        let (_, room_id, res_id) = booked(&app).await;
        let uri = format!("/api/reservations/{res_id}");

        let (status, _) = send(&app, "PUT", &uri, Some(json!({"totalAmount": 1}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, "PUT", &uri, Some(json!({"checkOutDate": "2026-02-01"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Check-out date must be after check-in date");

        let (status, body) = send(&app, "PUT", &uri, Some(json!({"status": "checked-in"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "checked-in");
        assert_eq!(body["guest"]["totalStays"], 0);

        let (_, room) = send(&app, "GET", &format!("/api/rooms/{room_id}"), None).await;
        assert_eq!(room["status"], "available");

        let (status, body) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Reservation deleted successfully");
    }

    #[tokio::test]
    async fn conflicts_and_validation() {
        let app = app().await;
        let (guest_id, room_id, _) = booked(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/rooms",
            Some(json!({"number": "101", "roomType": "single", "floor": 1, "capacity": 1, "pricePerNight": 90})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("101"));

        let (status, _) = send(&app, "DELETE", &format!("/api/rooms/{room_id}"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        let (status, _) = send(&app, "DELETE", &format!("/api/guests/{guest_id}"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            "POST",
            "/api/guests",
            Some(json!({"firstName": "A", "lastName": "B", "email": "not-an-email", "phone": "1"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = send(
            &app,
            "POST",
            "/api/rooms",
            Some(json!({"number": "102", "roomType": "penthouse", "floor": 1, "capacity": 1, "pricePerNight": 90})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unknown room type 'penthouse'");
    }

    #[tokio::test]
    async fn lists_are_paginated() {
        let app = app().await;
        for n in 0..5 {
            create(
                &app,
                "/api/rooms",
                json!({"number": format!("2{n:02}"), "roomType": "single", "floor": 2, "capacity": 1, "pricePerNight": 80}),
            )
            .await;
        }

        let (status, page) = send(&app, "GET", "/api/rooms?floor=2&page=2&limit=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 5);
        assert_eq!(page["page"], 2);
        assert_eq!(page["limit"], 2);
        assert_eq!(page["totalPages"], 3);
        assert_eq!(page["items"].as_array().unwrap().len(), 2);
        assert_eq!(page["items"][0]["number"], "202");
    }

    #[tokio::test]
    async fn ledger_balances_follow_transaction_status() {
        let app = app().await;
        let cash = create(&app, "/api/accounts", json!({"code": "1000", "name": "Cash", "accountType": "asset"})).await;
        let revenue = create(
            &app,
            "/api/accounts",
            json!({"code": "4000", "name": "Room revenue", "accountType": "revenue"}),
        )
        .await;
        let cash_uri = format!("/api/accounts/{}", cash["id"].as_str().unwrap());
        let revenue_uri = format!("/api/accounts/{}", revenue["id"].as_str().unwrap());

        let txn = create(
            &app,
            "/api/transactions",
            json!({
                "accountId": cash["id"],
                "counterAccountId": revenue["id"],
                "direction": "credit",
                "amount": 450,
                "description": "Room 101, 3 nights",
                "transactionDate": "2026-03-04",
                "status": "completed"
            }),
        )
        .await;
        assert_eq!(send(&app, "GET", &cash_uri, None).await.1["balance"], 450);
        assert_eq!(send(&app, "GET", &revenue_uri, None).await.1["balance"], -450);

        let revenue_filter = format!("/api/transactions?accountId={}", revenue["id"].as_str().unwrap());
        let (status, body) = send(&app, "GET", &revenue_filter, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);

        let txn_uri = format!("/api/transactions/{}", txn["id"].as_str().unwrap());
        let (status, body) = send(&app, "PUT", &txn_uri, Some(json!({"counterAccountId": null}))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["counterAccountId"].is_null());
        assert_eq!(send(&app, "GET", &cash_uri, None).await.1["balance"], 450);
        assert_eq!(send(&app, "GET", &revenue_uri, None).await.1["balance"], 0);
        assert_eq!(send(&app, "GET", &revenue_filter, None).await.1["total"], 0);

        let (status, _) = send(&app, "PUT", &txn_uri, Some(json!({"status": "cancelled"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(send(&app, "GET", &cash_uri, None).await.1["balance"], 0);
        assert_eq!(send(&app, "GET", &revenue_uri, None).await.1["balance"], 0);

        let (status, _) = send(&app, "PUT", &cash_uri, Some(json!({"balance": 10}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_metrics_and_docs_are_served() {
        let app = app().await;

        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"]["status"], "ok");

        let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let (status, doc) = send(&app, "GET", "/api-doc/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(doc["paths"]["/api/reservations/check-in/{id}"].is_object());
    }
}
