/// Database row types — these map directly to SQLite rows. Ids and
/// timestamps stay as TEXT here; parsing into Uuid/DateTime happens at the
/// API boundary, keeping this layer free of wire concerns.

pub struct UserRow {
    pub id: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub given_names: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub photo: Option<String>,
    pub created_at: String,
}

pub struct ConnectionRequestRow {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub status: String,
    pub created_at: String,
    pub method: Option<String>,
}

pub struct ConversationRow {
    pub id: String,
    pub kind: String,
    pub title: Option<String>,
    pub created_at: String,
}

pub struct ConversationMemberRow {
    pub id: String,
    pub user_id: String,
    pub conversation_id: String,
    pub role: String,
    pub joined_at: String,
    pub method: Option<String>,
}

pub struct MessageRow {
    pub id: String,
    pub conversation_id: String,
    pub author_id: String,
    pub body: String,
    pub sent_at: String,
    pub edited_at: String,
    pub read: bool,
    pub method: Option<String>,
}

pub struct PublicationRow {
    pub id: String,
    pub author_id: String,
    pub body: String,
    pub video: Option<String>,
    pub method: Option<String>,
}

pub struct PublicationPhotoRow {
    pub id: String,
    pub publication_id: String,
    pub photo: String,
    pub method: Option<String>,
}

pub struct CommentRow {
    pub id: String,
    pub publication_id: String,
    pub body: String,
    pub method: Option<String>,
}

pub struct ReplyRow {
    pub id: String,
    pub comment_id: String,
    pub body: String,
    pub method: Option<String>,
}

pub struct PostLikeRow {
    pub id: String,
    pub publication_id: String,
    pub liked: bool,
    pub method: Option<String>,
}

pub struct CommentLikeRow {
    pub id: String,
    pub comment_id: String,
    pub liked: bool,
    pub method: Option<String>,
}

pub struct NotificationRow {
    pub id: String,
    pub user_id: String,
    pub label: String,
    pub created_at: String,
    pub method: Option<String>,
}

pub struct PreferenceRow {
    pub id: String,
    pub user_id: String,
    pub language: Option<String>,
    pub notifications_enabled: bool,
    pub method: Option<String>,
}

pub struct EventRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub starts_at: String,
    pub ends_at: String,
    pub venue: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image: Option<String>,
    pub method: Option<String>,
}

pub struct StandRow {
    pub id: String,
    pub name: String,
    pub logo: String,
    pub description: Option<String>,
    pub method: Option<String>,
}

pub struct PanelRow {
    pub id: String,
    pub event_id: String,
    pub title: String,
    pub starts_at: String,
    pub ends_at: String,
    pub room: String,
    pub method: Option<String>,
}

pub struct PanelistRow {
    pub id: String,
    pub name: String,
    pub given_names: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub photo: Option<String>,
    pub bio: Option<String>,
    pub role: String,
    pub method: Option<String>,
}

pub struct PanelFavoriteRow {
    pub id: String,
    pub user_id: String,
    pub panel_id: String,
    pub created_at: String,
}
