//! Router and request handlers.
//!
//! Handlers only decode input, build an `OpContext` and call the store.
//! Every error goes through `ApiError` so bodies are always `{"error": ...}`.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use desk_core::entities::{NewTicket, Ticket, TicketId};
use desk_core::responses::{HealthResponse, StatusChangeRequest, TicketListResponse};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

type ApiResult<T> = Result<T, ApiError>;

/// Listing parameters. Missing values fall back to the store defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    pub status: String,
    pub sort: String,
    pub order: String,
}

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/tickets", get(list_tickets))
        .route("/api/v1/tickets/", get(list_tickets))
        .route("/api/v1/tickets/create", post(create_ticket))
        .route("/api/v1/tickets/:id", get(get_ticket).put(update_ticket))
        .route("/api/v1/tickets/:id/status", put(update_ticket_status))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

fn ticket_id(path: Result<Path<TicketId>, PathRejection>) -> ApiResult<TicketId> {
    path.map(|Path(id)| id).map_err(|_| ApiError::InvalidId)
}

fn body<T>(json: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    json.map(|Json(value)| value)
        .map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))
}

async fn list_tickets(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<TicketListResponse>> {
    let Query(params) = params.map_err(|rejection| ApiError::InvalidQuery(rejection.body_text()))?;
    let tickets = state
        .store()
        .get_tickets(
            &state.op_context(),
            &params.status,
            &params.sort,
            &params.order,
        )
        .await?;
    Ok(Json(TicketListResponse { tickets }))
}

async fn get_ticket(
    State(state): State<AppState>,
    id: Result<Path<TicketId>, PathRejection>,
) -> ApiResult<Json<Ticket>> {
    let id = ticket_id(id)?;
    let ticket = state
        .store()
        .get_ticket_by_id(&state.op_context(), id)
        .await?;
    Ok(Json(ticket))
}

async fn create_ticket(
    State(state): State<AppState>,
    payload: Result<Json<NewTicket>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Ticket>)> {
    let payload = body(payload)?;
    let ticket = state
        .store()
        .create_ticket(&state.op_context(), payload)
        .await?;
    tracing::info!(id = ticket.id, status = %ticket.status, "ticket created");
    Ok((StatusCode::CREATED, Json(ticket)))
}

async fn update_ticket(
    State(state): State<AppState>,
    id: Result<Path<TicketId>, PathRejection>,
    payload: Result<Json<NewTicket>, JsonRejection>,
) -> ApiResult<Json<Ticket>> {
    let id = ticket_id(id)?;
    let payload = body(payload)?;
    let ticket = state
        .store()
        .update_ticket(&state.op_context(), id, payload)
        .await?;
    Ok(Json(ticket))
}

async fn update_ticket_status(
    State(state): State<AppState>,
    id: Result<Path<TicketId>, PathRejection>,
    payload: Result<Json<StatusChangeRequest>, JsonRejection>,
) -> ApiResult<Json<Ticket>> {
    let id = ticket_id(id)?;
    let request = body(payload)?;
    let ticket = state
        .store()
        .update_ticket_status(&state.op_context(), id, &request.status)
        .await?;
    tracing::info!(id, status = %ticket.status, "ticket status changed");
    Ok(Json(ticket))
}
