// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::UtcOffset;
use tracing::{error, info};
use withdrawal_gate_api::{
    ApiError, AuditEventView, AuditTimelineResponse, AuthenticatedActor, BulkRestrictionRequest,
    BulkRestrictionResponse, ListUsersResponse, OverviewResponse, RegisterUserRequest,
    RegisterUserResponse, Role, SetWithdrawalScheduleRequest, SetWithdrawalScheduleResponse,
    SystemClock, WithdrawRequest, WithdrawalOutcome, WithdrawalService,
    WithdrawalSettingsResponse, authenticate_stub,
};
use withdrawal_gate_audit::Cause;
use withdrawal_gate_persistence::Persistence;

/// Withdrawal Gate Server - HTTP server for withdrawal eligibility and scheduling
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Offset from UTC, in minutes, of the business day boundary
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    utc_offset_minutes: i32,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The withdrawal service. Its methods block on store access and run on
    /// the blocking pool.
    service: Arc<WithdrawalService>,
}

/// Who is acting and why, carried by every administrator request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActorFields {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
}

/// API request for replacing the withdrawal schedule.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SetScheduleApiRequest {
    #[serde(flatten)]
    actor: ActorFields,
    #[serde(flatten)]
    schedule: SetWithdrawalScheduleRequest,
}

/// API request for a bulk restriction.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct BulkRestrictionApiRequest {
    #[serde(flatten)]
    actor: ActorFields,
    #[serde(flatten)]
    restriction: BulkRestrictionRequest,
}

/// API request for registering a user.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RegisterUserApiRequest {
    #[serde(flatten)]
    actor: ActorFields,
    #[serde(flatten)]
    user: RegisterUserRequest,
}

/// Query parameters for listing users.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListUsersQuery {
    /// Only restricted (`true`) or only unrestricted (`false`) users.
    withdrawal_restricted: Option<bool>,
}

/// Query parameters for the audit timeline endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuditTimelineQuery {
    /// Restrict the timeline to one user.
    user_id: Option<i64>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Parses a role string into a Role enum.
fn parse_role(role_str: &str) -> Result<Role, HttpError> {
    role_str.to_lowercase().parse().map_err(|_| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: format!("Invalid role: '{role_str}'. Must be 'admin' or 'user'"),
    })
}

/// Authenticates the actor named in an administrator request.
fn authenticate(fields: ActorFields) -> Result<(AuthenticatedActor, Cause), HttpError> {
    let role: Role = parse_role(&fields.actor_role)?;
    let actor: AuthenticatedActor =
        authenticate_stub(fields.actor_id, role).map_err(|e| HttpError {
            status: StatusCode::UNAUTHORIZED,
            message: e.to_string(),
        })?;
    Ok((actor, Cause::new(fields.cause_id, fields.cause_description)))
}

/// Runs a service call on the blocking pool.
async fn run_blocking<T, F>(app_state: &AppState, call: F) -> Result<T, HttpError>
where
    T: Send + 'static,
    F: FnOnce(&WithdrawalService) -> Result<T, ApiError> + Send + 'static,
{
    let service: Arc<WithdrawalService> = Arc::clone(&app_state.service);
    tokio::task::spawn_blocking(move || call(&service))
        .await
        .map_err(|e| HttpError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Worker task failed: {e}"),
        })?
        .map_err(HttpError::from)
}

/// Handler for GET `/users/{user_id}/overview` endpoint.
///
/// Returns the user's restriction status and evaluated withdrawal schedule.
async fn handle_get_overview(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<OverviewResponse>, HttpError> {
    info!(user_id, "Handling get_overview request");

    let response: OverviewResponse = run_blocking(&app_state, move |service| {
        service.get_withdrawal_overview(user_id)
    })
    .await?;

    Ok(Json(response))
}

/// Handler for POST `/users/{user_id}/withdraw` endpoint.
///
/// Responds 200 when the withdrawal is recorded and 409 when the schedule or
/// a restriction refuses it.
async fn handle_withdraw(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<WithdrawRequest>,
) -> Result<(StatusCode, Json<WithdrawalOutcome>), HttpError> {
    info!(user_id, method = %req.method, "Handling withdraw request");

    let actor: AuthenticatedActor = AuthenticatedActor::for_user(user_id);
    let cause: Cause = Cause::new(
        format!("withdraw-{user_id}"),
        String::from("Withdrawal submission"),
    );

    let outcome: WithdrawalOutcome = run_blocking(&app_state, move |service| {
        service.attempt_withdrawal(user_id, &req, &actor, cause)
    })
    .await?;

    let status: StatusCode = if outcome.is_accepted() {
        StatusCode::OK
    } else {
        StatusCode::CONFLICT
    };
    Ok((status, Json(outcome)))
}

/// Handler for GET `/admin/withdrawal-settings` endpoint.
async fn handle_get_withdrawal_settings(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<WithdrawalSettingsResponse>, HttpError> {
    info!("Handling get_withdrawal_settings request");

    let response: WithdrawalSettingsResponse =
        run_blocking(&app_state, WithdrawalService::get_withdrawal_settings).await?;

    Ok(Json(response))
}

/// Handler for PUT `/admin/withdrawal-settings` endpoint.
///
/// Authenticates the actor, authorizes the action, and replaces the schedule.
async fn handle_set_withdrawal_settings(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SetScheduleApiRequest>,
) -> Result<Json<SetWithdrawalScheduleResponse>, HttpError> {
    info!(
        actor_id = %req.actor.actor_id,
        role = %req.actor.actor_role,
        schedule_type = %req.schedule.schedule_type,
        "Handling set_withdrawal_settings request"
    );

    let (actor, cause): (AuthenticatedActor, Cause) = authenticate(req.actor)?;
    let schedule: SetWithdrawalScheduleRequest = req.schedule;

    let response: SetWithdrawalScheduleResponse = run_blocking(&app_state, move |service| {
        service.set_withdrawal_schedule(&schedule, &actor, cause)
    })
    .await?;

    Ok(Json(response))
}

/// Handler for PATCH `/admin/users/bulk-withdrawal-restriction` endpoint.
async fn handle_bulk_restriction(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<BulkRestrictionApiRequest>,
) -> Result<Json<BulkRestrictionResponse>, HttpError> {
    info!(
        actor_id = %req.actor.actor_id,
        role = %req.actor.actor_role,
        restricted = req.restriction.restricted,
        user_count = req.restriction.user_ids.len(),
        "Handling bulk_restriction request"
    );

    let (actor, cause): (AuthenticatedActor, Cause) = authenticate(req.actor)?;
    let restriction: BulkRestrictionRequest = req.restriction;

    let response: BulkRestrictionResponse = run_blocking(&app_state, move |service| {
        service.apply_bulk_restriction(&restriction, &actor, &cause)
    })
    .await?;

    Ok(Json(response))
}

/// Handler for POST `/admin/users` endpoint.
async fn handle_register_user(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterUserApiRequest>,
) -> Result<Json<RegisterUserResponse>, HttpError> {
    info!(
        actor_id = %req.actor.actor_id,
        role = %req.actor.actor_role,
        "Handling register_user request"
    );

    let (actor, cause): (AuthenticatedActor, Cause) = authenticate(req.actor)?;
    let user: RegisterUserRequest = req.user;

    let response: RegisterUserResponse = run_blocking(&app_state, move |service| {
        service.register_user(&user, &actor, cause)
    })
    .await?;

    Ok(Json(response))
}

/// Handler for GET `/admin/users` endpoint.
async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ListUsersResponse>, HttpError> {
    info!(
        withdrawal_restricted = ?query.withdrawal_restricted,
        "Handling list_users request"
    );

    let response: ListUsersResponse = run_blocking(&app_state, move |service| {
        service.list_users(query.withdrawal_restricted)
    })
    .await?;

    Ok(Json(response))
}

/// Handler for GET `/audit/timeline` endpoint.
async fn handle_get_audit_timeline(
    AxumState(app_state): AxumState<AppState>,
    Query(params): Query<AuditTimelineQuery>,
) -> Result<Json<AuditTimelineResponse>, HttpError> {
    info!(user_id = ?params.user_id, "Handling get_audit_timeline request");

    let response: AuditTimelineResponse = run_blocking(&app_state, move |service| {
        service.get_audit_timeline(params.user_id)
    })
    .await?;

    Ok(Json(response))
}

/// Handler for GET `/audit/event/{event_id}` endpoint.
async fn handle_get_audit_event(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<AuditEventView>, HttpError> {
    info!(event_id, "Handling get_audit_event request");

    let response: AuditEventView = run_blocking(&app_state, move |service| {
        service.get_audit_event(event_id)
    })
    .await?;

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/users/{user_id}/overview", get(handle_get_overview))
        .route("/users/{user_id}/withdraw", post(handle_withdraw))
        .route(
            "/admin/withdrawal-settings",
            get(handle_get_withdrawal_settings).put(handle_set_withdrawal_settings),
        )
        .route(
            "/admin/users/bulk-withdrawal-restriction",
            patch(handle_bulk_restriction),
        )
        .route(
            "/admin/users",
            get(handle_list_users).post(handle_register_user),
        )
        .route("/audit/timeline", get(handle_get_audit_timeline))
        .route("/audit/event/{event_id}", get(handle_get_audit_event))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Withdrawal Gate Server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let offset: UtcOffset =
        UtcOffset::from_whole_seconds(args.utc_offset_minutes.saturating_mul(60))?;
    info!(%offset, "Business day boundary");
    let service: WithdrawalService =
        WithdrawalService::new(persistence, Box::new(SystemClock::new(offset)))?;

    let app_state: AppState = AppState {
        service: Arc::new(service),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener: tokio::net::TcpListener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use serde_json::{Value, json};
    use time::{Date, Month};
    use tower::ServiceExt;
    use withdrawal_gate_api::FixedClock;

    /// Tuesday, 2026-03-03.
    fn tuesday() -> Date {
        Date::from_calendar_date(2026, Month::March, 3).expect("Valid test date")
    }

    /// Wednesday, 2026-03-04.
    fn wednesday() -> Date {
        Date::from_calendar_date(2026, Month::March, 4).expect("Valid test date")
    }

    /// Helper to create test app state with in-memory persistence and a
    /// pinned date.
    fn create_test_app_state(today: Date) -> AppState {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        let service: WithdrawalService =
            WithdrawalService::new(persistence, Box::new(FixedClock::new(today)))
                .expect("Failed to start service");
        AppState {
            service: Arc::new(service),
        }
    }

    fn admin_fields() -> Value {
        json!({
            "actorId": "admin1",
            "actorRole": "admin",
            "causeId": "test-cause",
            "causeDescription": "Test request",
        })
    }

    fn with_admin(body: Value) -> Value {
        let mut merged: Value = admin_fields();
        let fields = merged.as_object_mut().unwrap();
        for (key, value) in body.as_object().unwrap() {
            fields.insert(key.clone(), value.clone());
        }
        merged
    }

    async fn send(
        app_state: &AppState,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (HttpStatusCode, Value) {
        let app: Router = build_router(app_state.clone());
        let request: Request<Body> = match body {
            Some(body) => Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status: HttpStatusCode = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap()
        };
        (status, json)
    }

    async fn register(app_state: &AppState, name: &str) -> i64 {
        let (status, body) = send(
            app_state,
            "POST",
            "/admin/users",
            Some(with_admin(json!({ "displayName": name }))),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        body["userId"].as_i64().unwrap()
    }

    fn crypto_payload() -> Value {
        json!({
            "amount": 150.25,
            "method": "crypto",
            "crypto": { "cryptoWallet": "BTC", "walletAddress": "bc1qexampleaddress9876" },
        })
    }

    #[tokio::test]
    async fn test_register_user_as_admin_succeeds() {
        let app_state: AppState = create_test_app_state(wednesday());

        let (status, body) = send(
            &app_state,
            "POST",
            "/admin/users",
            Some(with_admin(json!({ "displayName": "Ann Lee" }))),
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["displayName"], "Ann Lee");
        assert!(body["userId"].as_i64().is_some());
    }

    #[tokio::test]
    async fn test_register_user_as_user_is_forbidden() {
        let app_state: AppState = create_test_app_state(wednesday());
        let mut request: Value = with_admin(json!({ "displayName": "Mallory" }));
        request["actorRole"] = json!("user");

        let (status, body) = send(&app_state, "POST", "/admin/users", Some(request)).await;

        assert_eq!(status, HttpStatusCode::FORBIDDEN);
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn test_invalid_role_returns_bad_request() {
        let app_state: AppState = create_test_app_state(wednesday());
        let mut request: Value = with_admin(json!({ "displayName": "Ann" }));
        request["actorRole"] = json!("operator");

        let (status, _body) = send(&app_state, "POST", "/admin/users", Some(request)).await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_blank_actor_is_unauthorized() {
        let app_state: AppState = create_test_app_state(wednesday());
        let mut request: Value = with_admin(json!({ "displayName": "Ann" }));
        request["actorId"] = json!("");

        let (status, _body) = send(&app_state, "POST", "/admin/users", Some(request)).await;

        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_get_withdrawal_settings_returns_default() {
        let app_state: AppState = create_test_app_state(wednesday());

        let (status, body) = send(&app_state, "GET", "/admin/withdrawal-settings", None).await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["settings"]["withdrawalScheduleType"], "daysOfWeek");
        assert_eq!(body["settings"]["withdrawalDaysOfWeek"], json!([1, 3, 5]));
    }

    #[tokio::test]
    async fn test_put_withdrawal_settings_replaces_schedule() {
        let app_state: AppState = create_test_app_state(wednesday());

        let (status, body) = send(
            &app_state,
            "PUT",
            "/admin/withdrawal-settings",
            Some(with_admin(
                json!({ "scheduleType": "interval", "intervalDays": 5 }),
            )),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert!(body["eventId"].as_i64().is_some());

        let (_, settings) = send(&app_state, "GET", "/admin/withdrawal-settings", None).await;
        assert_eq!(settings["settings"]["withdrawalScheduleType"], "interval");
        assert_eq!(settings["settings"]["withdrawalIntervalDays"], 5);
    }

    #[tokio::test]
    async fn test_put_invalid_settings_returns_bad_request() {
        let app_state: AppState = create_test_app_state(wednesday());

        let (status, body) = send(
            &app_state,
            "PUT",
            "/admin/withdrawal-settings",
            Some(with_admin(
                json!({ "scheduleType": "daysOfWeek", "daysOfWeek": [] }),
            )),
        )
        .await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert_eq!(body["error"], true);
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains("At least one withdrawal day")
        );
    }

    #[tokio::test]
    async fn test_overview_reports_schedule_and_restriction() {
        let app_state: AppState = create_test_app_state(tuesday());
        let user_id: i64 = register(&app_state, "Ann").await;

        let (status, body) = send(
            &app_state,
            "GET",
            &format!("/users/{user_id}/overview"),
            None,
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        let overview: &Value = &body["overview"];
        assert_eq!(overview["withdrawalRestricted"], false);
        assert_eq!(overview["withdrawalSchedule"]["allowedToday"], false);
        assert_eq!(
            overview["withdrawalSchedule"]["nextWithdrawalDate"],
            "2026-03-04"
        );
        assert_eq!(
            overview["withdrawalSchedule"]["nextWithdrawalDay"],
            "Wednesday"
        );
    }

    #[tokio::test]
    async fn test_overview_of_unknown_user_returns_not_found() {
        let app_state: AppState = create_test_app_state(wednesday());

        let (status, body) = send(&app_state, "GET", "/users/404/overview", None).await;

        assert_eq!(status, HttpStatusCode::NOT_FOUND);
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn test_withdraw_accepted_then_rejected_in_interval_mode() {
        let app_state: AppState = create_test_app_state(wednesday());
        let user_id: i64 = register(&app_state, "Ann").await;
        send(
            &app_state,
            "PUT",
            "/admin/withdrawal-settings",
            Some(with_admin(
                json!({ "scheduleType": "interval", "intervalDays": 2 }),
            )),
        )
        .await;
        let uri: String = format!("/users/{user_id}/withdraw");

        let (status, body) = send(&app_state, "POST", &uri, Some(crypto_payload())).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["status"], "accepted");
        assert_eq!(body["withdrawalDate"], "2026-03-04");

        let (status, body) = send(&app_state, "POST", &uri, Some(crypto_payload())).await;
        assert_eq!(status, HttpStatusCode::CONFLICT);
        assert_eq!(body["status"], "rejected");
        assert_eq!(body["reasonCode"], "OutsideScheduleInterval");
        assert_eq!(body["nextEligibleDate"], "2026-03-06");
    }

    #[tokio::test]
    async fn test_withdraw_with_bad_payload_returns_bad_request() {
        let app_state: AppState = create_test_app_state(wednesday());
        let user_id: i64 = register(&app_state, "Ann").await;

        let (status, _body) = send(
            &app_state,
            "POST",
            &format!("/users/{user_id}/withdraw"),
            Some(json!({ "amount": 10, "method": "bank" })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bulk_restriction_then_filtered_list() {
        let app_state: AppState = create_test_app_state(wednesday());
        let ann: i64 = register(&app_state, "Ann").await;
        let bob: i64 = register(&app_state, "Bob").await;

        let (status, body) = send(
            &app_state,
            "PATCH",
            "/admin/users/bulk-withdrawal-restriction",
            Some(with_admin(json!({
                "userIds": [bob, 999],
                "restricted": true,
                "reason": "KYC pending",
            }))),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["updatedCount"], 1);
        assert_eq!(body["skippedUserIds"], json!([999]));
        assert_eq!(body["failedUserIds"], json!([]));

        let (_, restricted) = send(
            &app_state,
            "GET",
            "/admin/users?withdrawalRestricted=true",
            None,
        )
        .await;
        assert_eq!(restricted["users"].as_array().unwrap().len(), 1);
        assert_eq!(restricted["users"][0]["userId"], bob);
        assert_eq!(
            restricted["users"][0]["withdrawalRestrictionReason"],
            "KYC pending"
        );

        let (_, unrestricted) = send(
            &app_state,
            "GET",
            "/admin/users?withdrawalRestricted=false",
            None,
        )
        .await;
        assert_eq!(unrestricted["users"][0]["userId"], ann);

        let (status, body) = send(
            &app_state,
            "POST",
            &format!("/users/{bob}/withdraw"),
            Some(crypto_payload()),
        )
        .await;
        assert_eq!(status, HttpStatusCode::CONFLICT);
        assert_eq!(body["reasonCode"], "ManuallyRestricted");
    }

    #[tokio::test]
    async fn test_bulk_restriction_with_blank_reason_returns_bad_request() {
        let app_state: AppState = create_test_app_state(wednesday());
        let ann: i64 = register(&app_state, "Ann").await;

        let (status, _body) = send(
            &app_state,
            "PATCH",
            "/admin/users/bulk-withdrawal-restriction",
            Some(with_admin(json!({
                "userIds": [ann],
                "restricted": true,
                "reason": "",
            }))),
        )
        .await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        let (_, restricted) = send(
            &app_state,
            "GET",
            "/admin/users?withdrawalRestricted=true",
            None,
        )
        .await;
        assert!(restricted["users"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_audit_timeline_for_user() {
        let app_state: AppState = create_test_app_state(wednesday());
        let user_id: i64 = register(&app_state, "Ann").await;
        send(
            &app_state,
            "POST",
            &format!("/users/{user_id}/withdraw"),
            Some(crypto_payload()),
        )
        .await;

        let (status, body) = send(
            &app_state,
            "GET",
            &format!("/audit/timeline?userId={user_id}"),
            None,
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        let events: &Vec<Value> = body["events"].as_array().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["action"], "RegisterUser");
        assert_eq!(events[1]["action"], "RecordWithdrawal");
        assert_eq!(events[1]["actorId"], user_id.to_string());

        let event_id: i64 = events[1]["eventId"].as_i64().unwrap();
        let (status, event) =
            send(&app_state, "GET", &format!("/audit/event/{event_id}"), None).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(event["action"], "RecordWithdrawal");
    }
}
