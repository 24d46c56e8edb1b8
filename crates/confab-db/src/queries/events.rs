use confab_types::enums::PanelistRole;
use rusqlite::{OptionalExtension, params};

use crate::models::{EventRow, PanelFavoriteRow, PanelRow, PanelistRow, StandRow};
use crate::{Database, DbError, Result};

const EVENT_COLUMNS: &str = "id, title, description, starts_at, ends_at, venue, \
     address, city, country, latitude, longitude, image, method";

impl Database {
    #[allow(clippy::too_many_arguments)]
    pub fn create_event(
        &self,
        id: &str,
        title: &str,
        description: &str,
        starts_at: &str,
        ends_at: &str,
        venue: &str,
        address: Option<&str>,
        city: Option<&str>,
        country: Option<&str>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        image: Option<&str>,
        method: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                &format!(
                    "INSERT INTO events ({EVENT_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
                ),
                params![
                    id, title, description, starts_at, ends_at, venue, address, city, country,
                    latitude, longitude, image, method
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_event(&self, id: &str) -> Result<Option<EventRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"))?;
            let row = stmt.query_row([id], map_event).optional()?;
            Ok(row)
        })
    }

    pub fn list_events(&self) -> Result<Vec<EventRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {EVENT_COLUMNS} FROM events ORDER BY starts_at"
            ))?;
            let rows = stmt
                .query_map([], map_event)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Cascades to the event's panels (and through them to panelist links
    /// and favorites).
    pub fn delete_event(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM events WHERE id = ?1", [id])?;
            if n == 0 {
                return Err(DbError::NotFound("event"));
            }
            Ok(())
        })
    }

    // -- Stands --

    pub fn create_stand(
        &self,
        id: &str,
        name: &str,
        logo: &str,
        description: Option<&str>,
        method: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO stands (id, name, logo, description, method)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, name, logo, description, method],
            )?;
            Ok(())
        })
    }

    pub fn list_stands(&self) -> Result<Vec<StandRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, name, logo, description, method FROM stands ORDER BY name")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(StandRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        logo: row.get(2)?,
                        description: row.get(3)?,
                        method: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn delete_stand(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM stands WHERE id = ?1", [id])?;
            if n == 0 {
                return Err(DbError::NotFound("stand"));
            }
            Ok(())
        })
    }

    // -- Panels --

    pub fn create_panel(
        &self,
        id: &str,
        event_id: &str,
        title: &str,
        starts_at: &str,
        ends_at: &str,
        room: &str,
        method: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO panels (id, event_id, title, starts_at, ends_at, room, method)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![id, event_id, title, starts_at, ends_at, room, method],
            )?;
            Ok(())
        })
    }

    pub fn get_panel(&self, id: &str) -> Result<Option<PanelRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PANEL_COLUMNS} FROM panels WHERE id = ?1"
            ))?;
            let row = stmt.query_row([id], map_panel).optional()?;
            Ok(row)
        })
    }

    pub fn list_event_panels(&self, event_id: &str) -> Result<Vec<PanelRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PANEL_COLUMNS} FROM panels WHERE event_id = ?1 ORDER BY starts_at"
            ))?;
            let rows = stmt
                .query_map([event_id], map_panel)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn delete_panel(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM panels WHERE id = ?1", [id])?;
            if n == 0 {
                return Err(DbError::NotFound("panel"));
            }
            Ok(())
        })
    }

    // -- Panelists --

    #[allow(clippy::too_many_arguments)]
    pub fn create_panelist(
        &self,
        id: &str,
        name: &str,
        given_names: &str,
        title: Option<&str>,
        company: Option<&str>,
        photo: Option<&str>,
        bio: Option<&str>,
        role: PanelistRole,
        method: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO panelists
                     (id, name, given_names, title, company, photo, bio, role, method)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![id, name, given_names, title, company, photo, bio, role.as_str(), method],
            )?;
            Ok(())
        })
    }

    pub fn get_panelist(&self, id: &str) -> Result<Option<PanelistRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PANELIST_COLUMNS} FROM panelists WHERE id = ?1"
            ))?;
            let row = stmt.query_row([id], map_panelist).optional()?;
            Ok(row)
        })
    }

    pub fn attach_panelist(&self, id: &str, panel_id: &str, panelist_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO panel_panelists (id, panel_id, panelist_id) VALUES (?1, ?2, ?3)",
                params![id, panel_id, panelist_id],
            )?;
            Ok(())
        })
    }

    pub fn list_panel_panelists(&self, panel_id: &str) -> Result<Vec<PanelistRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PANELIST_COLUMNS_QUALIFIED}
                 FROM panelists p
                 JOIN panel_panelists pp ON pp.panelist_id = p.id
                 WHERE pp.panel_id = ?1
                 ORDER BY p.name"
            ))?;
            let rows = stmt
                .query_map([panel_id], map_panelist)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Favorites --

    /// At most one favorite per (user, panel); a duplicate fails with
    /// `DbError::Unique`.
    pub fn add_panel_favorite(&self, id: &str, user_id: &str, panel_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO panel_favorites (id, user_id, panel_id) VALUES (?1, ?2, ?3)",
                params![id, user_id, panel_id],
            )?;
            Ok(())
        })
    }

    pub fn remove_panel_favorite(&self, user_id: &str, panel_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM panel_favorites WHERE user_id = ?1 AND panel_id = ?2",
                params![user_id, panel_id],
            )?;
            if n == 0 {
                return Err(DbError::NotFound("panel favorite"));
            }
            Ok(())
        })
    }

    pub fn list_user_favorites(&self, user_id: &str) -> Result<Vec<PanelFavoriteRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, panel_id, created_at FROM panel_favorites
                 WHERE user_id = ?1 ORDER BY created_at DESC",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(PanelFavoriteRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        panel_id: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

const PANEL_COLUMNS: &str = "id, event_id, title, starts_at, ends_at, room, method";
const PANELIST_COLUMNS: &str =
    "id, name, given_names, title, company, photo, bio, role, method";
const PANELIST_COLUMNS_QUALIFIED: &str =
    "p.id, p.name, p.given_names, p.title, p.company, p.photo, p.bio, p.role, p.method";

fn map_event(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        starts_at: row.get(3)?,
        ends_at: row.get(4)?,
        venue: row.get(5)?,
        address: row.get(6)?,
        city: row.get(7)?,
        country: row.get(8)?,
        latitude: row.get(9)?,
        longitude: row.get(10)?,
        image: row.get(11)?,
        method: row.get(12)?,
    })
}

fn map_panel(row: &rusqlite::Row<'_>) -> rusqlite::Result<PanelRow> {
    Ok(PanelRow {
        id: row.get(0)?,
        event_id: row.get(1)?,
        title: row.get(2)?,
        starts_at: row.get(3)?,
        ends_at: row.get(4)?,
        room: row.get(5)?,
        method: row.get(6)?,
    })
}

fn map_panelist(row: &rusqlite::Row<'_>) -> rusqlite::Result<PanelistRow> {
    Ok(PanelistRow {
        id: row.get(0)?,
        name: row.get(1)?,
        given_names: row.get(2)?,
        title: row.get(3)?,
        company: row.get(4)?,
        photo: row.get(5)?,
        bio: row.get(6)?,
        role: row.get(7)?,
        method: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_util::{db, user};
    use crate::{Database, DbError};
    use confab_types::enums::PanelistRole;
    use uuid::Uuid;

    fn event(db: &Database) -> String {
        let id = Uuid::new_v4().to_string();
        db.create_event(
            &id,
            "Trade Forum",
            "Annual forum",
            "2026-09-01 09:00:00",
            "2026-09-03 18:00:00",
            "Convention Centre",
            None,
            Some("Abidjan"),
            None,
            Some(5.336),
            Some(-4.027),
            None,
            None,
        )
        .unwrap();
        id
    }

    fn panel(db: &Database, event_id: &str) -> String {
        let id = Uuid::new_v4().to_string();
        db.create_panel(
            &id,
            event_id,
            "Opening keynote",
            "2026-09-01 09:30:00",
            "2026-09-01 10:30:00",
            "A1",
            None,
        )
        .unwrap();
        id
    }

    #[test]
    fn duplicate_favorite_rejected() {
        let db = db();
        let alice = user(&db, "alice@x.com");
        let ev = event(&db);
        let p = panel(&db, &ev);

        db.add_panel_favorite(&Uuid::new_v4().to_string(), &alice, &p)
            .unwrap();
        let err = db
            .add_panel_favorite(&Uuid::new_v4().to_string(), &alice, &p)
            .unwrap_err();
        assert!(matches!(err, DbError::Unique(_)), "got {err:?}");

        // Still exactly one row.
        assert_eq!(db.list_user_favorites(&alice).unwrap().len(), 1);
    }

    #[test]
    fn favorite_remove_then_readd() {
        let db = db();
        let alice = user(&db, "alice@x.com");
        let ev = event(&db);
        let p = panel(&db, &ev);

        db.add_panel_favorite(&Uuid::new_v4().to_string(), &alice, &p)
            .unwrap();
        db.remove_panel_favorite(&alice, &p).unwrap();
        assert!(matches!(
            db.remove_panel_favorite(&alice, &p).unwrap_err(),
            DbError::NotFound(_)
        ));
        // The pair is free again after removal.
        db.add_panel_favorite(&Uuid::new_v4().to_string(), &alice, &p)
            .unwrap();
    }

    #[test]
    fn delete_event_cascades_panels_links_and_favorites() {
        let db = db();
        let alice = user(&db, "alice@x.com");
        let ev = event(&db);
        let p = panel(&db, &ev);

        let speaker = Uuid::new_v4().to_string();
        db.create_panelist(
            &speaker,
            "Kone",
            "Awa",
            Some("CTO"),
            None,
            None,
            None,
            PanelistRole::Speaker,
            None,
        )
        .unwrap();
        db.attach_panelist(&Uuid::new_v4().to_string(), &p, &speaker)
            .unwrap();
        db.add_panel_favorite(&Uuid::new_v4().to_string(), &alice, &p)
            .unwrap();

        db.delete_event(&ev).unwrap();

        assert!(db.get_panel(&p).unwrap().is_none());
        assert!(db.list_panel_panelists(&p).unwrap().is_empty());
        assert!(db.list_user_favorites(&alice).unwrap().is_empty());
        // The panelist itself survives; only the link is owned by the panel.
        assert!(db.get_panelist(&speaker).unwrap().is_some());
    }

    #[test]
    fn panelist_attached_once_per_panel() {
        let db = db();
        let ev = event(&db);
        let p = panel(&db, &ev);
        let speaker = Uuid::new_v4().to_string();
        db.create_panelist(
            &speaker, "Kone", "Awa", None, None, None, None, PanelistRole::Moderator, None,
        )
        .unwrap();

        db.attach_panelist(&Uuid::new_v4().to_string(), &p, &speaker)
            .unwrap();
        let err = db
            .attach_panelist(&Uuid::new_v4().to_string(), &p, &speaker)
            .unwrap_err();
        assert!(matches!(err, DbError::Unique(_)), "got {err:?}");
    }

    #[test]
    fn stand_listing() {
        let db = db();
        db.create_stand(&Uuid::new_v4().to_string(), "Zephyr", "z.png", None, None)
            .unwrap();
        db.create_stand(
            &Uuid::new_v4().to_string(),
            "Acme",
            "a.png",
            Some("Gadgets"),
            None,
        )
        .unwrap();

        let stands = db.list_stands().unwrap();
        assert_eq!(stands.len(), 2);
        assert_eq!(stands[0].name, "Acme"); // ordered by name
    }
}
