use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use confab_types::api::{
    AddPhotoRequest, Claims, CreateCommentRequest, CreatePublicationRequest, CreateReplyRequest,
    LikeRequest,
};

use crate::auth::AppState;
use crate::convert::{
    comment_like_model, comment_model, photo_model, post_like_model, publication_model,
    reply_model,
};
use crate::ApiError;

pub async fn create_publication(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreatePublicationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = Uuid::new_v4();
    state.db.create_publication(
        &id.to_string(),
        &claims.sub.to_string(),
        &req.body,
        req.video.as_deref(),
        req.method.as_deref(),
    )?;

    let row = state
        .db
        .get_publication(&id.to_string())?
        .ok_or(ApiError::NotFound("publication"))?;
    Ok((StatusCode::CREATED, Json(publication_model(row, vec![]))))
}

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    50
}

pub async fn feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.db.list_publications(query.limit.min(200))?;
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let photos = state.db.list_publication_photos(&row.id)?;
        out.push(publication_model(row, photos));
    }
    Ok(Json(out))
}

pub async fn get_publication(
    State(state): State<AppState>,
    Path(publication_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .get_publication(&publication_id.to_string())?
        .ok_or(ApiError::NotFound("publication"))?;
    let photos = state.db.list_publication_photos(&row.id)?;
    Ok(Json(publication_model(row, photos)))
}

/// Deleting a publication takes its photos, comments and likes with it.
pub async fn delete_publication(
    State(state): State<AppState>,
    Path(publication_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .get_publication(&publication_id.to_string())?
        .ok_or(ApiError::NotFound("publication"))?;
    if row.author_id != claims.sub.to_string() {
        return Err(ApiError::Forbidden);
    }

    state.db.delete_publication(&publication_id.to_string())?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_photo(
    State(state): State<AppState>,
    Path(publication_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<AddPhotoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .get_publication(&publication_id.to_string())?
        .ok_or(ApiError::NotFound("publication"))?;
    if row.author_id != claims.sub.to_string() {
        return Err(ApiError::Forbidden);
    }

    let id = Uuid::new_v4();
    state.db.add_publication_photo(
        &id.to_string(),
        &publication_id.to_string(),
        &req.photo,
        req.method.as_deref(),
    )?;

    let photos = state.db.list_publication_photos(&publication_id.to_string())?;
    let created = photos
        .into_iter()
        .find(|p| p.id == id.to_string())
        .ok_or(ApiError::NotFound("photo"))?;
    Ok((StatusCode::CREATED, Json(photo_model(created))))
}

// -- Comments & replies --

pub async fn create_comment(
    State(state): State<AppState>,
    Path(publication_id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = Uuid::new_v4();
    state.db.create_comment(
        &id.to_string(),
        &publication_id.to_string(),
        &req.body,
        req.method.as_deref(),
    )?;

    let row = state
        .db
        .get_comment(&id.to_string())?
        .ok_or(ApiError::NotFound("comment"))?;
    Ok((StatusCode::CREATED, Json(comment_model(row))))
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(publication_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.db.list_comments(&publication_id.to_string())?;
    let out: Vec<_> = rows.into_iter().map(comment_model).collect();
    Ok(Json(out))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path((_publication_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    state.db.delete_comment(&comment_id.to_string())?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_reply(
    State(state): State<AppState>,
    Path((_publication_id, comment_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<CreateReplyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = Uuid::new_v4();
    state.db.create_reply(
        &id.to_string(),
        &comment_id.to_string(),
        &req.body,
        req.method.as_deref(),
    )?;

    let replies = state.db.list_replies(&comment_id.to_string())?;
    let created = replies
        .into_iter()
        .find(|r| r.id == id.to_string())
        .ok_or(ApiError::NotFound("reply"))?;
    Ok((StatusCode::CREATED, Json(reply_model(created))))
}

pub async fn list_replies(
    State(state): State<AppState>,
    Path((_publication_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.db.list_replies(&comment_id.to_string())?;
    let out: Vec<_> = rows.into_iter().map(reply_model).collect();
    Ok(Json(out))
}

// -- Likes --
//
// Like rows carry no user reference, so each request appends a new row;
// counts are row counts.

pub async fn like_publication(
    State(state): State<AppState>,
    Path(publication_id): Path<Uuid>,
    Json(req): Json<LikeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = Uuid::new_v4();
    state.db.create_post_like(
        &id.to_string(),
        &publication_id.to_string(),
        req.method.as_deref(),
    )?;

    let likes = state.db.list_post_likes(&publication_id.to_string())?;
    let out: Vec<_> = likes.into_iter().map(post_like_model).collect();
    Ok((StatusCode::CREATED, Json(out)))
}

pub async fn like_comment(
    State(state): State<AppState>,
    Path((_publication_id, comment_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<LikeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = Uuid::new_v4();
    state.db.create_comment_like(
        &id.to_string(),
        &comment_id.to_string(),
        req.method.as_deref(),
    )?;

    let likes = state.db.list_comment_likes(&comment_id.to_string())?;
    let out: Vec<_> = likes.into_iter().map(comment_like_model).collect();
    Ok((StatusCode::CREATED, Json(out)))
}
