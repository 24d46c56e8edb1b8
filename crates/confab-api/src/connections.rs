use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use confab_types::api::{Claims, CreateConnectionRequest, RespondConnectionRequest};
use confab_types::enums::ConnectionStatus;

use crate::auth::AppState;
use crate::convert::connection_request_model;
use crate::ApiError;

pub async fn create_request(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateConnectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.recipient_id == claims.sub {
        return Err(ApiError::validation(
            "recipient_id",
            "cannot send a connection request to yourself",
        ));
    }

    let id = Uuid::new_v4();
    state.db.create_connection_request(
        &id.to_string(),
        &claims.sub.to_string(),
        &req.recipient_id.to_string(),
        req.method.as_deref(),
    )?;

    // Best effort: a failed notification must not fail the request itself.
    let label = format!("New connection request from {}", claims.email);
    if let Err(e) = state.db.create_notification(
        &Uuid::new_v4().to_string(),
        &req.recipient_id.to_string(),
        &label,
        None,
    ) {
        tracing::warn!("could not notify recipient: {e}");
    }

    let row = state
        .db
        .get_connection_request(&id.to_string())?
        .ok_or(ApiError::NotFound("connection request"))?;
    Ok((StatusCode::CREATED, Json(connection_request_model(row))))
}

pub async fn list_sent(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.db.list_sent_requests(&claims.sub.to_string())?;
    let out: Vec<_> = rows.into_iter().map(connection_request_model).collect();
    Ok(Json(out))
}

pub async fn list_received(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.db.list_received_requests(&claims.sub.to_string())?;
    let out: Vec<_> = rows.into_iter().map(connection_request_model).collect();
    Ok(Json(out))
}

/// Only the recipient may answer, and only with accepted/rejected.
pub async fn respond(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<RespondConnectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.status == ConnectionStatus::Pending {
        return Err(ApiError::validation(
            "status",
            "response must be accepted or rejected",
        ));
    }

    let row = state
        .db
        .get_connection_request(&request_id.to_string())?
        .ok_or(ApiError::NotFound("connection request"))?;
    if row.recipient_id != claims.sub.to_string() {
        return Err(ApiError::Forbidden);
    }

    state
        .db
        .set_connection_status(&request_id.to_string(), req.status)?;

    let row = state
        .db
        .get_connection_request(&request_id.to_string())?
        .ok_or(ApiError::NotFound("connection request"))?;
    Ok(Json(connection_request_model(row)))
}

pub async fn delete_request(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .get_connection_request(&request_id.to_string())?
        .ok_or(ApiError::NotFound("connection request"))?;
    if row.sender_id != claims.sub.to_string() {
        return Err(ApiError::Forbidden);
    }

    state.db.delete_connection_request(&request_id.to_string())?;
    Ok(StatusCode::NO_CONTENT)
}
