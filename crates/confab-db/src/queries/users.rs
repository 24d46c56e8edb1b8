use rusqlite::{Connection, OptionalExtension, params};

use crate::models::UserRow;
use crate::{Database, DbError, Result};

const USER_COLUMNS: &str =
    "id, email, password, name, given_names, company, phone, photo, created_at";

impl Database {
    #[allow(clippy::too_many_arguments)]
    pub fn create_user(
        &self,
        id: &str,
        email: &str,
        password_hash: &str,
        name: &str,
        given_names: &str,
        company: Option<&str>,
        phone: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, email, password, name, given_names, company, phone)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![id, email, password_hash, name, given_names, company, phone],
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            query_user(conn, &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"), email)
        })
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            query_user(conn, &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"), id)
        })
    }

    /// Partial profile update: absent fields keep their current value.
    /// The id and email columns are never touched here.
    pub fn update_user_profile(
        &self,
        id: &str,
        name: Option<&str>,
        given_names: Option<&str>,
        company: Option<&str>,
        phone: Option<&str>,
        photo: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE users SET
                    name        = COALESCE(?2, name),
                    given_names = COALESCE(?3, given_names),
                    company     = COALESCE(?4, company),
                    phone       = COALESCE(?5, phone),
                    photo       = COALESCE(?6, photo)
                 WHERE id = ?1",
                params![id, name, given_names, company, phone, photo],
            )?;
            if n == 0 {
                return Err(DbError::NotFound("user"));
            }
            Ok(())
        })
    }

    /// Cascades to the user's connection requests (both directions),
    /// memberships, messages, publications, notifications, preference and
    /// panel favorites.
    pub fn delete_user(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            if n == 0 {
                return Err(DbError::NotFound("user"));
            }
            Ok(())
        })
    }
}

fn query_user(conn: &Connection, sql: &str, key: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(sql)?;
    let row = stmt
        .query_row([key], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                email: row.get(1)?,
                password: row.get(2)?,
                name: row.get(3)?,
                given_names: row.get(4)?,
                company: row.get(5)?,
                phone: row.get(6)?,
                photo: row.get(7)?,
                created_at: row.get(8)?,
            })
        })
        .optional()?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::super::test_util::{db, user};
    use crate::DbError;
    use uuid::Uuid;

    #[test]
    fn duplicate_email_rejected() {
        let db = db();
        user(&db, "a@x.com");

        let id = Uuid::new_v4().to_string();
        let err = db
            .create_user(&id, "a@x.com", "hash", "Roe", "John", None, None)
            .unwrap_err();
        assert!(matches!(err, DbError::Unique(_)), "got {err:?}");
    }

    #[test]
    fn lookup_by_email_and_id() {
        let db = db();
        let id = user(&db, "a@x.com");

        let by_email = db.get_user_by_email("a@x.com").unwrap().unwrap();
        assert_eq!(by_email.id, id);
        assert_eq!(by_email.name, "Doe");

        let by_id = db.get_user_by_id(&id).unwrap().unwrap();
        assert_eq!(by_id.email, "a@x.com");

        assert!(db.get_user_by_email("nobody@x.com").unwrap().is_none());
    }

    #[test]
    fn partial_profile_update() {
        let db = db();
        let id = user(&db, "a@x.com");

        db.update_user_profile(&id, None, None, Some("ACME"), None, None)
            .unwrap();

        let u = db.get_user_by_id(&id).unwrap().unwrap();
        assert_eq!(u.company.as_deref(), Some("ACME"));
        assert_eq!(u.name, "Doe"); // untouched
    }

    #[test]
    fn delete_user_cascades_to_preference_and_requests() {
        let db = db();
        let alice = user(&db, "alice@x.com");
        let bob = user(&db, "bob@x.com");

        db.create_preference(&Uuid::new_v4().to_string(), &alice, Some("fr"), true, None)
            .unwrap();
        db.create_connection_request(&Uuid::new_v4().to_string(), &alice, &bob, None)
            .unwrap();
        db.create_connection_request(&Uuid::new_v4().to_string(), &bob, &alice, None)
            .unwrap();

        db.delete_user(&alice).unwrap();

        assert!(db.get_preference(&alice).unwrap().is_none());
        assert!(db.list_sent_requests(&bob).unwrap().is_empty());
        assert!(db.list_received_requests(&bob).unwrap().is_empty());
    }

    #[test]
    fn delete_missing_user_is_not_found() {
        let db = db();
        let err = db.delete_user(&Uuid::new_v4().to_string()).unwrap_err();
        assert!(matches!(err, DbError::NotFound("user")));
    }
}
