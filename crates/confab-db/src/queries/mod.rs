//! CRUD methods on [`Database`](crate::Database), one module per domain.

mod connections;
mod conversations;
mod events;
mod notifications;
mod publications;
mod users;

#[cfg(test)]
pub(crate) mod test_util {
    use crate::Database;
    use uuid::Uuid;

    pub fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    pub fn user(db: &Database, email: &str) -> String {
        let id = Uuid::new_v4().to_string();
        db.create_user(&id, email, "argon2-hash", "Doe", "Jane", None, None)
            .unwrap();
        id
    }
}
