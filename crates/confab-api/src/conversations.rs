use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use confab_types::api::{
    AddMemberRequest, Claims, CreateConversationRequest, EditMessageRequest, SendMessageRequest,
};
use confab_types::enums::MemberRole;

use crate::auth::AppState;
use crate::convert::{conversation_model, member_model, message_model};
use crate::ApiError;

pub async fn create_conversation(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateConversationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = Uuid::new_v4();

    // Creator joins as admin, everyone else as member. One transaction: a
    // bad member id must not leave a half-created conversation behind.
    let mut members = vec![(
        Uuid::new_v4().to_string(),
        claims.sub.to_string(),
        MemberRole::Admin,
    )];
    members.extend(
        req.member_ids
            .iter()
            .filter(|member_id| **member_id != claims.sub)
            .map(|member_id| {
                (
                    Uuid::new_v4().to_string(),
                    member_id.to_string(),
                    MemberRole::Member,
                )
            }),
    );
    state.db.create_conversation_with_members(
        &id.to_string(),
        req.kind,
        req.title.as_deref(),
        &members,
    )?;

    let row = state
        .db
        .get_conversation(&id.to_string())?
        .ok_or(ApiError::NotFound("conversation"))?;
    Ok((StatusCode::CREATED, Json(conversation_model(row))))
}

pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.db.list_user_conversations(&claims.sub.to_string())?;
    let out: Vec<_> = rows.into_iter().map(conversation_model).collect();
    Ok(Json(out))
}

pub async fn list_members(
    State(state): State<AppState>,
    Path(conversation_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    require_member(&state, conversation_id, claims.sub)?;
    let rows = state.db.list_members(&conversation_id.to_string())?;
    let out: Vec<_> = rows.into_iter().map(member_model).collect();
    Ok(Json(out))
}

pub async fn add_member(
    State(state): State<AppState>,
    Path(conversation_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<AddMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_member(&state, conversation_id, claims.sub)?;
    state.db.add_member(
        &Uuid::new_v4().to_string(),
        &req.user_id.to_string(),
        &conversation_id.to_string(),
        req.role,
        req.method.as_deref(),
    )?;
    Ok(StatusCode::CREATED)
}

pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.db.list_members(&conversation_id.to_string())?;
    let caller = claims.sub.to_string();
    let is_admin = rows
        .iter()
        .any(|m| m.user_id == caller && m.role == "admin");
    if !is_admin {
        return Err(ApiError::Forbidden);
    }

    state.db.delete_conversation(&conversation_id.to_string())?;
    Ok(StatusCode::NO_CONTENT)
}

// -- Messages --

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Cursor-based pagination — pass the `sent_at` of the oldest message
    /// from the previous page to fetch older ones.
    pub before: Option<String>,
}

fn default_limit() -> u32 {
    50
}

pub async fn send_message(
    State(state): State<AppState>,
    Path(conversation_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_member(&state, conversation_id, claims.sub)?;

    let id = Uuid::new_v4();
    state.db.insert_message(
        &id.to_string(),
        &conversation_id.to_string(),
        &claims.sub.to_string(),
        &req.body,
        req.method.as_deref(),
    )?;

    let row = state
        .db
        .get_message(&id.to_string())?
        .ok_or(ApiError::NotFound("message"))?;
    Ok((StatusCode::CREATED, Json(message_model(row))))
}

pub async fn get_messages(
    State(state): State<AppState>,
    Path(conversation_id): Path<Uuid>,
    Query(query): Query<MessageQuery>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    require_member(&state, conversation_id, claims.sub)?;

    let rows = state.db.get_messages(
        &conversation_id.to_string(),
        query.limit.min(200),
        query.before.as_deref(),
    )?;
    let out: Vec<_> = rows.into_iter().map(message_model).collect();
    Ok(Json(out))
}

/// Only the author may edit; editing bumps `edited_at`.
pub async fn edit_message(
    State(state): State<AppState>,
    Path((conversation_id, message_id)): Path<(Uuid, Uuid)>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<EditMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .get_message(&message_id.to_string())?
        .ok_or(ApiError::NotFound("message"))?;
    ensure_in_conversation(&row, conversation_id)?;
    if row.author_id != claims.sub.to_string() {
        return Err(ApiError::Forbidden);
    }

    state.db.update_message_body(&message_id.to_string(), &req.body)?;
    let row = state
        .db
        .get_message(&message_id.to_string())?
        .ok_or(ApiError::NotFound("message"))?;
    Ok(Json(message_model(row)))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path((conversation_id, message_id)): Path<(Uuid, Uuid)>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    require_member(&state, conversation_id, claims.sub)?;

    // Membership only grants access to this conversation's messages, so the
    // message must actually live here.
    let row = state
        .db
        .get_message(&message_id.to_string())?
        .ok_or(ApiError::NotFound("message"))?;
    ensure_in_conversation(&row, conversation_id)?;

    state.db.mark_message_read(&message_id.to_string())?;
    Ok(StatusCode::NO_CONTENT)
}

fn require_member(state: &AppState, conversation_id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
    if !state
        .db
        .is_member(&conversation_id.to_string(), &user_id.to_string())?
    {
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

/// A message addressed through the wrong conversation path is treated as
/// absent rather than acted on.
fn ensure_in_conversation(
    row: &confab_db::models::MessageRow,
    conversation_id: Uuid,
) -> Result<(), ApiError> {
    if row.conversation_id != conversation_id.to_string() {
        return Err(ApiError::NotFound("message"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use confab_db::models::MessageRow;

    fn message_in(conversation_id: Uuid) -> MessageRow {
        MessageRow {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.to_string(),
            author_id: Uuid::new_v4().to_string(),
            body: "hello".into(),
            sent_at: "2026-08-30 12:00:00".into(),
            edited_at: "2026-08-30 12:00:00".into(),
            read: false,
            method: None,
        }
    }

    #[test]
    fn message_from_another_conversation_is_not_found() {
        let ours = Uuid::new_v4();
        let theirs = Uuid::new_v4();
        let row = message_in(theirs);

        let err = ensure_in_conversation(&row, ours).unwrap_err();
        assert!(matches!(err, ApiError::NotFound("message")));
        assert!(ensure_in_conversation(&row, theirs).is_ok());
    }
}
