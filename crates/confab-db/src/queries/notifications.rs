use rusqlite::{OptionalExtension, params};
use uuid::Uuid;

use crate::models::{NotificationRow, PreferenceRow};
use crate::{Database, DbError, Result};

impl Database {
    pub fn create_notification(
        &self,
        id: &str,
        user_id: &str,
        label: &str,
        method: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO notifications (id, user_id, label, method) VALUES (?1, ?2, ?3, ?4)",
                params![id, user_id, label, method],
            )?;
            Ok(())
        })
    }

    pub fn list_notifications(&self, user_id: &str) -> Result<Vec<NotificationRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, label, created_at, method FROM notifications
                 WHERE user_id = ?1 ORDER BY created_at DESC",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(NotificationRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        label: row.get(2)?,
                        created_at: row.get(3)?,
                        method: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn delete_notification(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM notifications WHERE id = ?1", [id])?;
            if n == 0 {
                return Err(DbError::NotFound("notification"));
            }
            Ok(())
        })
    }

    // -- Preferences (zero or one per user) --

    pub fn create_preference(
        &self,
        id: &str,
        user_id: &str,
        language: Option<&str>,
        notifications_enabled: bool,
        method: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO preferences (id, user_id, language, notifications_enabled, method)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, user_id, language, notifications_enabled, method],
            )?;
            Ok(())
        })
    }

    pub fn get_preference(&self, user_id: &str) -> Result<Option<PreferenceRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, language, notifications_enabled, method
                 FROM preferences WHERE user_id = ?1",
            )?;
            let row = stmt
                .query_row([user_id], |row| {
                    Ok(PreferenceRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        language: row.get(2)?,
                        notifications_enabled: row.get(3)?,
                        method: row.get(4)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    /// Update the user's preference record, creating it first if absent.
    /// Absent fields keep their current value (or the column default on
    /// first create).
    pub fn upsert_preference(
        &self,
        user_id: &str,
        language: Option<&str>,
        notifications_enabled: Option<bool>,
        method: Option<&str>,
    ) -> Result<PreferenceRow> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE preferences SET
                    language              = COALESCE(?2, language),
                    notifications_enabled = COALESCE(?3, notifications_enabled),
                    method                = COALESCE(?4, method)
                 WHERE user_id = ?1",
                params![user_id, language, notifications_enabled, method],
            )?;
            if n == 0 {
                conn.execute(
                    "INSERT INTO preferences (id, user_id, language, notifications_enabled, method)
                     VALUES (?1, ?2, ?3, COALESCE(?4, 1), ?5)",
                    params![
                        Uuid::new_v4().to_string(),
                        user_id,
                        language,
                        notifications_enabled,
                        method
                    ],
                )?;
            }
            Ok(())
        })?;

        self.get_preference(user_id)?
            .ok_or(DbError::NotFound("preference"))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_util::{db, user};
    use crate::DbError;
    use uuid::Uuid;

    #[test]
    fn at_most_one_preference_per_user() {
        let db = db();
        let alice = user(&db, "alice@x.com");

        db.create_preference(&Uuid::new_v4().to_string(), &alice, Some("fr"), true, None)
            .unwrap();
        let err = db
            .create_preference(&Uuid::new_v4().to_string(), &alice, Some("en"), false, None)
            .unwrap_err();
        assert!(matches!(err, DbError::Unique(_)), "got {err:?}");
    }

    #[test]
    fn upsert_creates_then_updates_in_place() {
        let db = db();
        let alice = user(&db, "alice@x.com");

        let created = db.upsert_preference(&alice, Some("fr"), None, None).unwrap();
        assert_eq!(created.language.as_deref(), Some("fr"));
        assert!(created.notifications_enabled); // column default

        let updated = db
            .upsert_preference(&alice, None, Some(false), None)
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.language.as_deref(), Some("fr"));
        assert!(!updated.notifications_enabled);
    }

    #[test]
    fn notification_listing_and_delete() {
        let db = db();
        let alice = user(&db, "alice@x.com");

        let id = Uuid::new_v4().to_string();
        db.create_notification(&id, &alice, "New connection request", None)
            .unwrap();
        assert_eq!(db.list_notifications(&alice).unwrap().len(), 1);

        db.delete_notification(&id).unwrap();
        assert!(db.list_notifications(&alice).unwrap().is_empty());
        assert!(matches!(
            db.delete_notification(&id).unwrap_err(),
            DbError::NotFound("notification")
        ));
    }
}
