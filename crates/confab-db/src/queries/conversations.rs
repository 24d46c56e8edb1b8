use confab_types::enums::{ConversationKind, MemberRole};
use rusqlite::{OptionalExtension, params};

use crate::models::{ConversationMemberRow, ConversationRow, MessageRow};
use crate::{Database, DbError, Result};

impl Database {
    pub fn create_conversation(
        &self,
        id: &str,
        kind: ConversationKind,
        title: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO conversations (id, kind, title) VALUES (?1, ?2, ?3)",
                params![id, kind.as_str(), title],
            )?;
            Ok(())
        })
    }

    /// Create a conversation and its initial memberships in one
    /// transaction: a bad member id rolls the whole thing back instead of
    /// leaving a half-populated conversation.
    pub fn create_conversation_with_members(
        &self,
        id: &str,
        kind: ConversationKind,
        title: Option<&str>,
        members: &[(String, String, MemberRole)],
    ) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            tx.execute(
                "INSERT INTO conversations (id, kind, title) VALUES (?1, ?2, ?3)",
                params![id, kind.as_str(), title],
            )?;
            for (member_id, user_id, role) in members {
                tx.execute(
                    "INSERT INTO conversation_members (id, user_id, conversation_id, role)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![member_id, user_id, id, role.as_str()],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
    }

    pub fn get_conversation(&self, id: &str) -> Result<Option<ConversationRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, kind, title, created_at FROM conversations WHERE id = ?1",
            )?;
            let row = stmt
                .query_row([id], |row| {
                    Ok(ConversationRow {
                        id: row.get(0)?,
                        kind: row.get(1)?,
                        title: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    pub fn list_user_conversations(&self, user_id: &str) -> Result<Vec<ConversationRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.kind, c.title, c.created_at
                 FROM conversations c
                 JOIN conversation_members m ON m.conversation_id = c.id
                 WHERE m.user_id = ?1
                 ORDER BY c.created_at DESC",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(ConversationRow {
                        id: row.get(0)?,
                        kind: row.get(1)?,
                        title: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Cascades to members and messages.
    pub fn delete_conversation(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM conversations WHERE id = ?1", [id])?;
            if n == 0 {
                return Err(DbError::NotFound("conversation"));
            }
            Ok(())
        })
    }

    // -- Members --

    pub fn add_member(
        &self,
        id: &str,
        user_id: &str,
        conversation_id: &str,
        role: MemberRole,
        method: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO conversation_members (id, user_id, conversation_id, role, method)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, user_id, conversation_id, role.as_str(), method],
            )?;
            Ok(())
        })
    }

    pub fn list_members(&self, conversation_id: &str) -> Result<Vec<ConversationMemberRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, conversation_id, role, joined_at, method
                 FROM conversation_members WHERE conversation_id = ?1
                 ORDER BY joined_at",
            )?;
            let rows = stmt
                .query_map([conversation_id], |row| {
                    Ok(ConversationMemberRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        conversation_id: row.get(2)?,
                        role: row.get(3)?,
                        joined_at: row.get(4)?,
                        method: row.get(5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn is_member(&self, conversation_id: &str, user_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM conversation_members
                     WHERE conversation_id = ?1 AND user_id = ?2",
                    params![conversation_id, user_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    // -- Messages --

    pub fn insert_message(
        &self,
        id: &str,
        conversation_id: &str,
        author_id: &str,
        body: &str,
        method: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (id, conversation_id, author_id, body, method)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, conversation_id, author_id, body, method],
            )?;
            Ok(())
        })
    }

    pub fn get_message(&self, id: &str) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1"
            ))?;
            let row = stmt.query_row([id], map_message).optional()?;
            Ok(row)
        })
    }

    /// Newest first; `before` pages backwards from a previous page's oldest
    /// `sent_at`.
    pub fn get_messages(
        &self,
        conversation_id: &str,
        limit: u32,
        before: Option<&str>,
    ) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let rows = match before {
                Some(before) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {MESSAGE_COLUMNS} FROM messages
                         WHERE conversation_id = ?1 AND sent_at < ?2
                         ORDER BY sent_at DESC LIMIT ?3"
                    ))?;
                    stmt.query_map(params![conversation_id, before, limit], map_message)?
                        .collect::<std::result::Result<Vec<_>, _>>()?
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {MESSAGE_COLUMNS} FROM messages
                         WHERE conversation_id = ?1
                         ORDER BY sent_at DESC LIMIT ?2"
                    ))?;
                    stmt.query_map(params![conversation_id, limit], map_message)?
                        .collect::<std::result::Result<Vec<_>, _>>()?
                }
            };
            Ok(rows)
        })
    }

    pub fn update_message_body(&self, id: &str, body: &str) -> Result<()> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE messages SET body = ?2, edited_at = datetime('now') WHERE id = ?1",
                params![id, body],
            )?;
            if n == 0 {
                return Err(DbError::NotFound("message"));
            }
            Ok(())
        })
    }

    pub fn mark_message_read(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let n = conn.execute("UPDATE messages SET read = 1 WHERE id = ?1", [id])?;
            if n == 0 {
                return Err(DbError::NotFound("message"));
            }
            Ok(())
        })
    }
}

const MESSAGE_COLUMNS: &str =
    "id, conversation_id, author_id, body, sent_at, edited_at, read, method";

fn map_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        author_id: row.get(2)?,
        body: row.get(3)?,
        sent_at: row.get(4)?,
        edited_at: row.get(5)?,
        read: row.get(6)?,
        method: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_util::{db, user};
    use confab_types::enums::{ConversationKind, MemberRole};
    use uuid::Uuid;

    fn conversation(db: &crate::Database, kind: ConversationKind) -> String {
        let id = Uuid::new_v4().to_string();
        db.create_conversation(&id, kind, Some("kickoff")).unwrap();
        id
    }

    #[test]
    fn membership_and_listing() {
        let db = db();
        let alice = user(&db, "alice@x.com");
        let bob = user(&db, "bob@x.com");
        let conv = conversation(&db, ConversationKind::Group);

        db.add_member(&Uuid::new_v4().to_string(), &alice, &conv, MemberRole::Admin, None)
            .unwrap();
        db.add_member(&Uuid::new_v4().to_string(), &bob, &conv, MemberRole::Member, None)
            .unwrap();

        assert!(db.is_member(&conv, &alice).unwrap());
        assert!(db.is_member(&conv, &bob).unwrap());

        let members = db.list_members(&conv).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(db.list_user_conversations(&alice).unwrap().len(), 1);
    }

    #[test]
    fn bad_member_id_rolls_back_conversation_creation() {
        let db = db();
        let alice = user(&db, "alice@x.com");

        let conv = Uuid::new_v4().to_string();
        let members = vec![
            (Uuid::new_v4().to_string(), alice.clone(), MemberRole::Admin),
            // nonexistent user
            (
                Uuid::new_v4().to_string(),
                Uuid::new_v4().to_string(),
                MemberRole::Member,
            ),
        ];
        let err = db
            .create_conversation_with_members(&conv, ConversationKind::Group, None, &members)
            .unwrap_err();
        assert!(matches!(err, crate::DbError::ForeignKey(_)), "got {err:?}");

        // Nothing survived the rollback: no conversation, no memberships.
        assert!(db.get_conversation(&conv).unwrap().is_none());
        assert!(!db.is_member(&conv, &alice).unwrap());
        assert!(db.list_user_conversations(&alice).unwrap().is_empty());
    }

    #[test]
    fn message_edit_and_read_flag() {
        let db = db();
        let alice = user(&db, "alice@x.com");
        let conv = conversation(&db, ConversationKind::Private);
        db.add_member(&Uuid::new_v4().to_string(), &alice, &conv, MemberRole::Member, None)
            .unwrap();

        let mid = Uuid::new_v4().to_string();
        db.insert_message(&mid, &conv, &alice, "hello", None).unwrap();

        let m = db.get_message(&mid).unwrap().unwrap();
        assert!(!m.read);
        assert_eq!(m.body, "hello");

        db.update_message_body(&mid, "hello (edited)").unwrap();
        db.mark_message_read(&mid).unwrap();

        let m = db.get_message(&mid).unwrap().unwrap();
        assert!(m.read);
        assert_eq!(m.body, "hello (edited)");
    }

    #[test]
    fn delete_conversation_cascades_members_and_messages() {
        let db = db();
        let alice = user(&db, "alice@x.com");
        let conv = conversation(&db, ConversationKind::Private);
        db.add_member(&Uuid::new_v4().to_string(), &alice, &conv, MemberRole::Member, None)
            .unwrap();
        let mid = Uuid::new_v4().to_string();
        db.insert_message(&mid, &conv, &alice, "hello", None).unwrap();

        db.delete_conversation(&conv).unwrap();

        assert!(db.get_message(&mid).unwrap().is_none());
        assert!(!db.is_member(&conv, &alice).unwrap());
        assert!(db.list_user_conversations(&alice).unwrap().is_empty());
    }

    #[test]
    fn message_pagination_with_before() {
        let db = db();
        let alice = user(&db, "alice@x.com");
        let conv = conversation(&db, ConversationKind::Private);

        for i in 0..3 {
            let mid = Uuid::new_v4().to_string();
            db.insert_message(&mid, &conv, &alice, &format!("m{i}"), None)
                .unwrap();
            // Distinct sent_at values so the cursor is deterministic.
            db.with_conn(|conn| {
                conn.execute(
                    "UPDATE messages SET sent_at = ?2 WHERE id = ?1",
                    rusqlite::params![mid, format!("2026-01-0{} 12:00:00", i + 1)],
                )?;
                Ok(())
            })
            .unwrap();
        }

        let page = db.get_messages(&conv, 2, None).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].body, "m2");

        let older = db.get_messages(&conv, 2, Some(&page[1].sent_at)).unwrap();
        assert_eq!(older.len(), 1);
        assert_eq!(older[0].body, "m0");
    }
}
