use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use confab_types::api::{Claims, UpdatePreferenceRequest};

use crate::auth::AppState;
use crate::convert::{notification_model, preference_model};
use crate::ApiError;

pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.db.list_notifications(&claims.sub.to_string())?;
    let out: Vec<_> = rows.into_iter().map(notification_model).collect();
    Ok(Json(out))
}

pub async fn delete_notification(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    // Only the owner may dismiss it.
    let owned = state
        .db
        .list_notifications(&claims.sub.to_string())?
        .into_iter()
        .any(|n| n.id == notification_id.to_string());
    if !owned {
        return Err(ApiError::NotFound("notification"));
    }

    state.db.delete_notification(&notification_id.to_string())?;
    Ok(StatusCode::NO_CONTENT)
}

// -- Preferences --

pub async fn get_preference(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .get_preference(&claims.sub.to_string())?
        .ok_or(ApiError::NotFound("preference"))?;
    Ok(Json(preference_model(row)))
}

/// Upsert: creates the record the first time, patches it afterwards.
pub async fn update_preference(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdatePreferenceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state.db.upsert_preference(
        &claims.sub.to_string(),
        req.language.as_deref(),
        req.notifications_enabled,
        req.method.as_deref(),
    )?;
    Ok(Json(preference_model(row)))
}
