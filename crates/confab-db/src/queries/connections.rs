use confab_types::enums::ConnectionStatus;
use rusqlite::{OptionalExtension, params};

use crate::models::ConnectionRequestRow;
use crate::{Database, DbError, Result};

const REQUEST_COLUMNS: &str = "id, sender_id, recipient_id, status, created_at, method";

impl Database {
    /// Requests are directional; sending twice to the same recipient is not
    /// deduplicated.
    pub fn create_connection_request(
        &self,
        id: &str,
        sender_id: &str,
        recipient_id: &str,
        method: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO connection_requests (id, sender_id, recipient_id, method)
                 VALUES (?1, ?2, ?3, ?4)",
                params![id, sender_id, recipient_id, method],
            )?;
            Ok(())
        })
    }

    pub fn get_connection_request(&self, id: &str) -> Result<Option<ConnectionRequestRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {REQUEST_COLUMNS} FROM connection_requests WHERE id = ?1"
            ))?;
            let row = stmt.query_row([id], map_request).optional()?;
            Ok(row)
        })
    }

    pub fn list_sent_requests(&self, sender_id: &str) -> Result<Vec<ConnectionRequestRow>> {
        self.list_requests("sender_id", sender_id)
    }

    pub fn list_received_requests(&self, recipient_id: &str) -> Result<Vec<ConnectionRequestRow>> {
        self.list_requests("recipient_id", recipient_id)
    }

    fn list_requests(&self, column: &str, user_id: &str) -> Result<Vec<ConnectionRequestRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {REQUEST_COLUMNS} FROM connection_requests
                 WHERE {column} = ?1 ORDER BY created_at DESC"
            ))?;
            let rows = stmt
                .query_map([user_id], map_request)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn set_connection_status(&self, id: &str, status: ConnectionStatus) -> Result<()> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE connection_requests SET status = ?2 WHERE id = ?1",
                params![id, status.as_str()],
            )?;
            if n == 0 {
                return Err(DbError::NotFound("connection request"));
            }
            Ok(())
        })
    }

    pub fn delete_connection_request(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM connection_requests WHERE id = ?1", [id])?;
            if n == 0 {
                return Err(DbError::NotFound("connection request"));
            }
            Ok(())
        })
    }
}

fn map_request(row: &rusqlite::Row<'_>) -> rusqlite::Result<ConnectionRequestRow> {
    Ok(ConnectionRequestRow {
        id: row.get(0)?,
        sender_id: row.get(1)?,
        recipient_id: row.get(2)?,
        status: row.get(3)?,
        created_at: row.get(4)?,
        method: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_util::{db, user};
    use crate::DbError;
    use confab_types::enums::ConnectionStatus;
    use uuid::Uuid;

    #[test]
    fn request_lifecycle() {
        let db = db();
        let alice = user(&db, "alice@x.com");
        let bob = user(&db, "bob@x.com");

        let id = Uuid::new_v4().to_string();
        db.create_connection_request(&id, &alice, &bob, Some("qr-scan"))
            .unwrap();

        let row = db.get_connection_request(&id).unwrap().unwrap();
        assert_eq!(row.status, "pending");
        assert_eq!(row.method.as_deref(), Some("qr-scan"));

        db.set_connection_status(&id, ConnectionStatus::Accepted)
            .unwrap();
        let row = db.get_connection_request(&id).unwrap().unwrap();
        assert_eq!(row.status, "accepted");

        assert_eq!(db.list_sent_requests(&alice).unwrap().len(), 1);
        assert_eq!(db.list_received_requests(&bob).unwrap().len(), 1);
        assert!(db.list_received_requests(&alice).unwrap().is_empty());
    }

    #[test]
    fn request_to_missing_user_is_referential_error() {
        let db = db();
        let alice = user(&db, "alice@x.com");

        let err = db
            .create_connection_request(
                &Uuid::new_v4().to_string(),
                &alice,
                &Uuid::new_v4().to_string(),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKey(_)), "got {err:?}");
    }

    #[test]
    fn raw_status_outside_literal_set_rejected() {
        let db = db();
        let alice = user(&db, "alice@x.com");
        let bob = user(&db, "bob@x.com");
        let id = Uuid::new_v4().to_string();
        db.create_connection_request(&id, &alice, &bob, None).unwrap();

        // Bypass the typed API to prove the CHECK constraint holds on its own.
        let err = db
            .with_conn(|conn| {
                conn.execute(
                    "UPDATE connection_requests SET status = 'cancelled' WHERE id = ?1",
                    [id.as_str()],
                )?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)), "got {err:?}");
    }
}
