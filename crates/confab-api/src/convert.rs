//! Row → wire-model conversions. Rows keep ids/timestamps as TEXT; the
//! parsing here is tolerant the same way reads are elsewhere: a corrupt
//! value is logged and replaced with a default rather than failing the
//! whole listing.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use confab_db::models::*;
use confab_types::enums::{
    ConnectionStatus, ConversationKind, MemberRole, PanelistRole, UnknownLiteral,
};
use confab_types::models::*;

pub(crate) fn parse_uuid(s: &str, context: &'static str) -> Uuid {
    s.parse().unwrap_or_else(|e| {
        warn!("Corrupt {context} id {s:?}: {e}");
        Uuid::default()
    })
}

pub(crate) fn parse_datetime(s: &str, context: &'static str) -> DateTime<Utc> {
    s.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without
            // timezone. Parse as naive UTC and convert.
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt {context} timestamp {s:?}: {e}");
            DateTime::default()
        })
}

fn parse_literal<T>(s: &str, fallback: T) -> T
where
    T: FromStr<Err = UnknownLiteral>,
{
    s.parse().unwrap_or_else(|e| {
        warn!("{e}");
        fallback
    })
}

pub(crate) fn user_model(row: UserRow) -> User {
    User {
        id: parse_uuid(&row.id, "user"),
        email: row.email,
        name: row.name,
        given_names: row.given_names,
        company: row.company,
        phone: row.phone,
        photo: row.photo,
        created_at: parse_datetime(&row.created_at, "user"),
    }
}

pub(crate) fn connection_request_model(row: ConnectionRequestRow) -> ConnectionRequest {
    ConnectionRequest {
        id: parse_uuid(&row.id, "connection request"),
        sender_id: parse_uuid(&row.sender_id, "connection request sender"),
        recipient_id: parse_uuid(&row.recipient_id, "connection request recipient"),
        status: parse_literal(&row.status, ConnectionStatus::Pending),
        created_at: parse_datetime(&row.created_at, "connection request"),
        method: row.method,
    }
}

pub(crate) fn conversation_model(row: ConversationRow) -> Conversation {
    Conversation {
        id: parse_uuid(&row.id, "conversation"),
        kind: parse_literal(&row.kind, ConversationKind::Private),
        title: row.title,
        created_at: parse_datetime(&row.created_at, "conversation"),
    }
}

pub(crate) fn member_model(row: ConversationMemberRow) -> ConversationMember {
    ConversationMember {
        id: parse_uuid(&row.id, "membership"),
        user_id: parse_uuid(&row.user_id, "membership user"),
        conversation_id: parse_uuid(&row.conversation_id, "membership conversation"),
        role: parse_literal(&row.role, MemberRole::Member),
        joined_at: parse_datetime(&row.joined_at, "membership"),
        method: row.method,
    }
}

pub(crate) fn message_model(row: MessageRow) -> Message {
    Message {
        id: parse_uuid(&row.id, "message"),
        conversation_id: parse_uuid(&row.conversation_id, "message conversation"),
        author_id: parse_uuid(&row.author_id, "message author"),
        body: row.body,
        sent_at: parse_datetime(&row.sent_at, "message sent_at"),
        edited_at: parse_datetime(&row.edited_at, "message edited_at"),
        read: row.read,
        method: row.method,
    }
}

pub(crate) fn publication_model(row: PublicationRow, photos: Vec<PublicationPhotoRow>) -> Publication {
    Publication {
        id: parse_uuid(&row.id, "publication"),
        author_id: parse_uuid(&row.author_id, "publication author"),
        body: row.body,
        video: row.video,
        method: row.method,
        photos: photos.into_iter().map(photo_model).collect(),
    }
}

pub(crate) fn photo_model(row: PublicationPhotoRow) -> PublicationPhoto {
    PublicationPhoto {
        id: parse_uuid(&row.id, "photo"),
        publication_id: parse_uuid(&row.publication_id, "photo publication"),
        photo: row.photo,
        method: row.method,
    }
}

pub(crate) fn comment_model(row: CommentRow) -> Comment {
    Comment {
        id: parse_uuid(&row.id, "comment"),
        publication_id: parse_uuid(&row.publication_id, "comment publication"),
        body: row.body,
        method: row.method,
    }
}

pub(crate) fn reply_model(row: ReplyRow) -> Reply {
    Reply {
        id: parse_uuid(&row.id, "reply"),
        comment_id: parse_uuid(&row.comment_id, "reply comment"),
        body: row.body,
        method: row.method,
    }
}

pub(crate) fn post_like_model(row: PostLikeRow) -> PostLike {
    PostLike {
        id: parse_uuid(&row.id, "post like"),
        publication_id: parse_uuid(&row.publication_id, "post like publication"),
        like: row.liked,
        method: row.method,
    }
}

pub(crate) fn comment_like_model(row: CommentLikeRow) -> CommentLike {
    CommentLike {
        id: parse_uuid(&row.id, "comment like"),
        comment_id: parse_uuid(&row.comment_id, "comment like comment"),
        like: row.liked,
        method: row.method,
    }
}

pub(crate) fn notification_model(row: NotificationRow) -> Notification {
    Notification {
        id: parse_uuid(&row.id, "notification"),
        user_id: parse_uuid(&row.user_id, "notification user"),
        label: row.label,
        created_at: parse_datetime(&row.created_at, "notification"),
        method: row.method,
    }
}

pub(crate) fn preference_model(row: PreferenceRow) -> Preference {
    Preference {
        id: parse_uuid(&row.id, "preference"),
        user_id: parse_uuid(&row.user_id, "preference user"),
        language: row.language,
        notifications_enabled: row.notifications_enabled,
        method: row.method,
    }
}

pub(crate) fn event_model(row: EventRow) -> Event {
    Event {
        id: parse_uuid(&row.id, "event"),
        title: row.title,
        description: row.description,
        starts_at: parse_datetime(&row.starts_at, "event starts_at"),
        ends_at: parse_datetime(&row.ends_at, "event ends_at"),
        venue: row.venue,
        address: row.address,
        city: row.city,
        country: row.country,
        latitude: row.latitude,
        longitude: row.longitude,
        image: row.image,
        method: row.method,
    }
}

pub(crate) fn stand_model(row: StandRow) -> Stand {
    Stand {
        id: parse_uuid(&row.id, "stand"),
        name: row.name,
        logo: row.logo,
        description: row.description,
        method: row.method,
    }
}

pub(crate) fn panel_model(row: PanelRow) -> Panel {
    Panel {
        id: parse_uuid(&row.id, "panel"),
        event_id: parse_uuid(&row.event_id, "panel event"),
        title: row.title,
        starts_at: parse_datetime(&row.starts_at, "panel starts_at"),
        ends_at: parse_datetime(&row.ends_at, "panel ends_at"),
        room: row.room,
        method: row.method,
    }
}

pub(crate) fn panelist_model(row: PanelistRow) -> Panelist {
    Panelist {
        id: parse_uuid(&row.id, "panelist"),
        name: row.name,
        given_names: row.given_names,
        title: row.title,
        company: row.company,
        photo: row.photo,
        bio: row.bio,
        role: parse_literal(&row.role, PanelistRole::Speaker),
        method: row.method,
    }
}

pub(crate) fn favorite_model(row: PanelFavoriteRow) -> PanelFavorite {
    PanelFavorite {
        id: parse_uuid(&row.id, "favorite"),
        user_id: parse_uuid(&row.user_id, "favorite user"),
        panel_id: parse_uuid(&row.panel_id, "favorite panel"),
        created_at: parse_datetime(&row.created_at, "favorite"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_naive_timestamp_parses_as_utc() {
        let dt = parse_datetime("2026-08-30 12:34:56", "test");
        assert_eq!(dt.to_rfc3339(), "2026-08-30T12:34:56+00:00");
    }

    #[test]
    fn corrupt_values_fall_back() {
        assert_eq!(parse_uuid("not-a-uuid", "test"), Uuid::default());
        assert_eq!(parse_datetime("whenever", "test"), DateTime::<Utc>::default());
        assert_eq!(
            parse_literal("unknown", ConnectionStatus::Pending),
            ConnectionStatus::Pending
        );
    }
}
