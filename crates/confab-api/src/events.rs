use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use confab_types::api::{
    AttachPanelistRequest, Claims, CreateEventRequest, CreatePanelRequest, CreatePanelistRequest,
    CreateStandRequest,
};

use crate::auth::AppState;
use crate::convert::{event_model, favorite_model, panel_model, panelist_model, stand_model};
use crate::ApiError;

/// Events store their schedule timestamps in SQLite's "YYYY-MM-DD HH:MM:SS"
/// shape so string ordering matches chronological ordering.
fn sqlite_timestamp(dt: &chrono::DateTime<chrono::Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.ends_at < req.starts_at {
        return Err(ApiError::validation("ends_at", "event ends before it starts"));
    }

    let id = Uuid::new_v4();
    state.db.create_event(
        &id.to_string(),
        &req.title,
        &req.description,
        &sqlite_timestamp(&req.starts_at),
        &sqlite_timestamp(&req.ends_at),
        &req.venue,
        req.address.as_deref(),
        req.city.as_deref(),
        req.country.as_deref(),
        req.latitude,
        req.longitude,
        req.image.as_deref(),
        req.method.as_deref(),
    )?;

    let row = state
        .db
        .get_event(&id.to_string())?
        .ok_or(ApiError::NotFound("event"))?;
    Ok((StatusCode::CREATED, Json(event_model(row))))
}

pub async fn list_events(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = state.db.list_events()?;
    let out: Vec<_> = rows.into_iter().map(event_model).collect();
    Ok(Json(out))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .get_event(&event_id.to_string())?
        .ok_or(ApiError::NotFound("event"))?;
    let panels = state.db.list_event_panels(&event_id.to_string())?;

    Ok(Json(serde_json::json!({
        "event": event_model(row),
        "panels": panels.into_iter().map(panel_model).collect::<Vec<_>>(),
    })))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.db.delete_event(&event_id.to_string())?;
    Ok(StatusCode::NO_CONTENT)
}

// -- Stands --

pub async fn create_stand(
    State(state): State<AppState>,
    Json(req): Json<CreateStandRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = Uuid::new_v4();
    state.db.create_stand(
        &id.to_string(),
        &req.name,
        &req.logo,
        req.description.as_deref(),
        req.method.as_deref(),
    )?;

    let stands = state.db.list_stands()?;
    let created = stands
        .into_iter()
        .find(|s| s.id == id.to_string())
        .ok_or(ApiError::NotFound("stand"))?;
    Ok((StatusCode::CREATED, Json(stand_model(created))))
}

pub async fn list_stands(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = state.db.list_stands()?;
    let out: Vec<_> = rows.into_iter().map(stand_model).collect();
    Ok(Json(out))
}

pub async fn delete_stand(
    State(state): State<AppState>,
    Path(stand_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.db.delete_stand(&stand_id.to_string())?;
    Ok(StatusCode::NO_CONTENT)
}

// -- Panels --

pub async fn create_panel(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<CreatePanelRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.ends_at < req.starts_at {
        return Err(ApiError::validation("ends_at", "panel ends before it starts"));
    }

    let id = Uuid::new_v4();
    state.db.create_panel(
        &id.to_string(),
        &event_id.to_string(),
        &req.title,
        &sqlite_timestamp(&req.starts_at),
        &sqlite_timestamp(&req.ends_at),
        &req.room,
        req.method.as_deref(),
    )?;

    let row = state
        .db
        .get_panel(&id.to_string())?
        .ok_or(ApiError::NotFound("panel"))?;
    Ok((StatusCode::CREATED, Json(panel_model(row))))
}

pub async fn get_panel(
    State(state): State<AppState>,
    Path(panel_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .get_panel(&panel_id.to_string())?
        .ok_or(ApiError::NotFound("panel"))?;
    let panelists = state.db.list_panel_panelists(&panel_id.to_string())?;

    Ok(Json(serde_json::json!({
        "panel": panel_model(row),
        "panelists": panelists.into_iter().map(panelist_model).collect::<Vec<_>>(),
    })))
}

pub async fn delete_panel(
    State(state): State<AppState>,
    Path(panel_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.db.delete_panel(&panel_id.to_string())?;
    Ok(StatusCode::NO_CONTENT)
}

// -- Panelists --

pub async fn create_panelist(
    State(state): State<AppState>,
    Json(req): Json<CreatePanelistRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = Uuid::new_v4();
    state.db.create_panelist(
        &id.to_string(),
        &req.name,
        &req.given_names,
        req.title.as_deref(),
        req.company.as_deref(),
        req.photo.as_deref(),
        req.bio.as_deref(),
        req.role,
        req.method.as_deref(),
    )?;

    let row = state
        .db
        .get_panelist(&id.to_string())?
        .ok_or(ApiError::NotFound("panelist"))?;
    Ok((StatusCode::CREATED, Json(panelist_model(row))))
}

pub async fn attach_panelist(
    State(state): State<AppState>,
    Path(panel_id): Path<Uuid>,
    Json(req): Json<AttachPanelistRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.db.attach_panelist(
        &Uuid::new_v4().to_string(),
        &panel_id.to_string(),
        &req.panelist_id.to_string(),
    )?;
    Ok(StatusCode::CREATED)
}

// -- Favorites --

/// Favoriting the same panel twice surfaces the uniqueness violation as 409.
pub async fn add_favorite(
    State(state): State<AppState>,
    Path(panel_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let id = Uuid::new_v4();
    state.db.add_panel_favorite(
        &id.to_string(),
        &claims.sub.to_string(),
        &panel_id.to_string(),
    )?;

    let favorites = state.db.list_user_favorites(&claims.sub.to_string())?;
    let created = favorites
        .into_iter()
        .find(|f| f.id == id.to_string())
        .ok_or(ApiError::NotFound("panel favorite"))?;
    Ok((StatusCode::CREATED, Json(favorite_model(created))))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(panel_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .db
        .remove_panel_favorite(&claims.sub.to_string(), &panel_id.to_string())?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.db.list_user_favorites(&claims.sub.to_string())?;
    let out: Vec<_> = rows.into_iter().map(favorite_model).collect();
    Ok(Json(out))
}
