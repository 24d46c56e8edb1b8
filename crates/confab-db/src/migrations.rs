use rusqlite::Connection;
use tracing::info;

use crate::Result;

/// Full schema. Every table keys on a caller-supplied UUID stored as TEXT;
/// ids are never updated after insert. Enumerated columns repeat their
/// literal set in a CHECK so bad values are rejected even on raw writes.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            name        TEXT NOT NULL,
            given_names TEXT NOT NULL,
            company     TEXT,
            phone       TEXT,
            photo       TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS connection_requests (
            id           TEXT PRIMARY KEY,
            sender_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            recipient_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            status       TEXT NOT NULL DEFAULT 'pending'
                         CHECK (status IN ('pending', 'accepted', 'rejected')),
            created_at   TEXT NOT NULL DEFAULT (datetime('now')),
            method       TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_connection_requests_sender
            ON connection_requests(sender_id);
        CREATE INDEX IF NOT EXISTS idx_connection_requests_recipient
            ON connection_requests(recipient_id);

        CREATE TABLE IF NOT EXISTS conversations (
            id          TEXT PRIMARY KEY,
            kind        TEXT NOT NULL DEFAULT 'private'
                        CHECK (kind IN ('private', 'group')),
            title       TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS conversation_members (
            id              TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            conversation_id TEXT NOT NULL REFERENCES conversations(id) ON DELETE CASCADE,
            role            TEXT NOT NULL DEFAULT 'member'
                            CHECK (role IN ('member', 'admin')),
            joined_at       TEXT NOT NULL DEFAULT (datetime('now')),
            method          TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_conversation_members_conversation
            ON conversation_members(conversation_id);
        CREATE INDEX IF NOT EXISTS idx_conversation_members_user
            ON conversation_members(user_id);

        CREATE TABLE IF NOT EXISTS messages (
            id              TEXT PRIMARY KEY,
            conversation_id TEXT NOT NULL REFERENCES conversations(id) ON DELETE CASCADE,
            author_id       TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            body            TEXT NOT NULL,
            sent_at         TEXT NOT NULL DEFAULT (datetime('now')),
            edited_at       TEXT NOT NULL DEFAULT (datetime('now')),
            read            INTEGER NOT NULL DEFAULT 0,
            method          TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_messages_conversation
            ON messages(conversation_id, sent_at);

        CREATE TABLE IF NOT EXISTS publications (
            id          TEXT PRIMARY KEY,
            author_id   TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            body        TEXT NOT NULL,
            video       TEXT,
            method      TEXT
        );

        CREATE TABLE IF NOT EXISTS publication_photos (
            id             TEXT PRIMARY KEY,
            publication_id TEXT NOT NULL REFERENCES publications(id) ON DELETE CASCADE,
            photo          TEXT NOT NULL,
            method         TEXT
        );

        CREATE TABLE IF NOT EXISTS comments (
            id             TEXT PRIMARY KEY,
            publication_id TEXT NOT NULL REFERENCES publications(id) ON DELETE CASCADE,
            body           TEXT NOT NULL,
            method         TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_comments_publication
            ON comments(publication_id);

        CREATE TABLE IF NOT EXISTS replies (
            id         TEXT PRIMARY KEY,
            comment_id TEXT NOT NULL REFERENCES comments(id) ON DELETE CASCADE,
            body       TEXT NOT NULL,
            method     TEXT
        );

        -- Like rows are an event log: no user column, no dedup.
        CREATE TABLE IF NOT EXISTS post_likes (
            id             TEXT PRIMARY KEY,
            publication_id TEXT NOT NULL REFERENCES publications(id) ON DELETE CASCADE,
            liked          INTEGER NOT NULL DEFAULT 1,
            method         TEXT
        );

        CREATE TABLE IF NOT EXISTS comment_likes (
            id         TEXT PRIMARY KEY,
            comment_id TEXT NOT NULL REFERENCES comments(id) ON DELETE CASCADE,
            liked      INTEGER NOT NULL DEFAULT 1,
            method     TEXT
        );

        CREATE TABLE IF NOT EXISTS notifications (
            id         TEXT PRIMARY KEY,
            user_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            label      TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            method     TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_notifications_user
            ON notifications(user_id, created_at);

        CREATE TABLE IF NOT EXISTS preferences (
            id                    TEXT PRIMARY KEY,
            user_id               TEXT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
            language              TEXT,
            notifications_enabled INTEGER NOT NULL DEFAULT 1,
            method                TEXT
        );

        CREATE TABLE IF NOT EXISTS events (
            id          TEXT PRIMARY KEY,
            title       TEXT NOT NULL,
            description TEXT NOT NULL,
            starts_at   TEXT NOT NULL,
            ends_at     TEXT NOT NULL,
            venue       TEXT NOT NULL,
            address     TEXT,
            city        TEXT,
            country     TEXT,
            latitude    REAL,
            longitude   REAL,
            image       TEXT,
            method      TEXT
        );

        CREATE TABLE IF NOT EXISTS stands (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            logo        TEXT NOT NULL,
            description TEXT,
            method      TEXT
        );

        CREATE TABLE IF NOT EXISTS panels (
            id        TEXT PRIMARY KEY,
            event_id  TEXT NOT NULL REFERENCES events(id) ON DELETE CASCADE,
            title     TEXT NOT NULL,
            starts_at TEXT NOT NULL,
            ends_at   TEXT NOT NULL,
            room      TEXT NOT NULL,
            method    TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_panels_event
            ON panels(event_id);

        CREATE TABLE IF NOT EXISTS panelists (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            given_names TEXT NOT NULL,
            title       TEXT,
            company     TEXT,
            photo       TEXT,
            bio         TEXT,
            role        TEXT NOT NULL DEFAULT 'speaker'
                        CHECK (role IN ('speaker', 'moderator')),
            method      TEXT
        );

        CREATE TABLE IF NOT EXISTS panel_panelists (
            id          TEXT PRIMARY KEY,
            panel_id    TEXT NOT NULL REFERENCES panels(id) ON DELETE CASCADE,
            panelist_id TEXT NOT NULL REFERENCES panelists(id) ON DELETE CASCADE,
            UNIQUE (panel_id, panelist_id)
        );

        CREATE TABLE IF NOT EXISTS panel_favorites (
            id         TEXT PRIMARY KEY,
            user_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            panel_id   TEXT NOT NULL REFERENCES panels(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (user_id, panel_id)
        );

        CREATE INDEX IF NOT EXISTS idx_panel_favorites_user
            ON panel_favorites(user_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
