use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use confab_types::api::{Claims, UpdateProfileRequest};

use crate::auth::AppState;
use crate::convert::user_model;
use crate::ApiError;

pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .get_user_by_id(&claims.sub.to_string())?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(user_model(row)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .get_user_by_id(&user_id.to_string())?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(user_model(row)))
}

/// Partial update of the caller's own profile; email and id are immutable.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = claims.sub.to_string();
    state.db.update_user_profile(
        &id,
        req.name.as_deref(),
        req.given_names.as_deref(),
        req.company.as_deref(),
        req.phone.as_deref(),
        req.photo.as_deref(),
    )?;

    let row = state
        .db
        .get_user_by_id(&id)?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(user_model(row)))
}

/// Deletes the account and, by cascade, everything the user owns.
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    state.db.delete_user(&claims.sub.to_string())?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
