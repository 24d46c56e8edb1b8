use rusqlite::{OptionalExtension, params};

use crate::models::{
    CommentLikeRow, CommentRow, PostLikeRow, PublicationPhotoRow, PublicationRow, ReplyRow,
};
use crate::{Database, DbError, Result};

impl Database {
    pub fn create_publication(
        &self,
        id: &str,
        author_id: &str,
        body: &str,
        video: Option<&str>,
        method: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO publications (id, author_id, body, video, method)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, author_id, body, video, method],
            )?;
            Ok(())
        })
    }

    pub fn get_publication(&self, id: &str) -> Result<Option<PublicationRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, author_id, body, video, method FROM publications WHERE id = ?1",
            )?;
            let row = stmt.query_row([id], map_publication).optional()?;
            Ok(row)
        })
    }

    /// Feed: newest first by insertion order (publications carry no
    /// timestamp column).
    pub fn list_publications(&self, limit: u32) -> Result<Vec<PublicationRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, author_id, body, video, method FROM publications
                 ORDER BY rowid DESC LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([limit], map_publication)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_user_publications(&self, author_id: &str) -> Result<Vec<PublicationRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, author_id, body, video, method FROM publications
                 WHERE author_id = ?1 ORDER BY rowid DESC",
            )?;
            let rows = stmt
                .query_map([author_id], map_publication)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Cascades to photos, comments (and their replies/likes) and post likes.
    pub fn delete_publication(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM publications WHERE id = ?1", [id])?;
            if n == 0 {
                return Err(DbError::NotFound("publication"));
            }
            Ok(())
        })
    }

    // -- Photos --

    pub fn add_publication_photo(
        &self,
        id: &str,
        publication_id: &str,
        photo: &str,
        method: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO publication_photos (id, publication_id, photo, method)
                 VALUES (?1, ?2, ?3, ?4)",
                params![id, publication_id, photo, method],
            )?;
            Ok(())
        })
    }

    pub fn list_publication_photos(&self, publication_id: &str) -> Result<Vec<PublicationPhotoRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, publication_id, photo, method FROM publication_photos
                 WHERE publication_id = ?1 ORDER BY rowid",
            )?;
            let rows = stmt
                .query_map([publication_id], |row| {
                    Ok(PublicationPhotoRow {
                        id: row.get(0)?,
                        publication_id: row.get(1)?,
                        photo: row.get(2)?,
                        method: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Comments & replies --

    pub fn create_comment(
        &self,
        id: &str,
        publication_id: &str,
        body: &str,
        method: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO comments (id, publication_id, body, method)
                 VALUES (?1, ?2, ?3, ?4)",
                params![id, publication_id, body, method],
            )?;
            Ok(())
        })
    }

    pub fn get_comment(&self, id: &str) -> Result<Option<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, publication_id, body, method FROM comments WHERE id = ?1")?;
            let row = stmt.query_row([id], map_comment).optional()?;
            Ok(row)
        })
    }

    pub fn list_comments(&self, publication_id: &str) -> Result<Vec<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, publication_id, body, method FROM comments
                 WHERE publication_id = ?1 ORDER BY rowid",
            )?;
            let rows = stmt
                .query_map([publication_id], map_comment)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Cascades to the comment's replies and likes.
    pub fn delete_comment(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM comments WHERE id = ?1", [id])?;
            if n == 0 {
                return Err(DbError::NotFound("comment"));
            }
            Ok(())
        })
    }

    pub fn create_reply(
        &self,
        id: &str,
        comment_id: &str,
        body: &str,
        method: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO replies (id, comment_id, body, method) VALUES (?1, ?2, ?3, ?4)",
                params![id, comment_id, body, method],
            )?;
            Ok(())
        })
    }

    pub fn list_replies(&self, comment_id: &str) -> Result<Vec<ReplyRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, comment_id, body, method FROM replies
                 WHERE comment_id = ?1 ORDER BY rowid",
            )?;
            let rows = stmt
                .query_map([comment_id], |row| {
                    Ok(ReplyRow {
                        id: row.get(0)?,
                        comment_id: row.get(1)?,
                        body: row.get(2)?,
                        method: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Likes --
    //
    // Each like row is an independent event; there is deliberately no
    // per-user dedup (see DESIGN.md).

    pub fn create_post_like(
        &self,
        id: &str,
        publication_id: &str,
        method: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO post_likes (id, publication_id, method) VALUES (?1, ?2, ?3)",
                params![id, publication_id, method],
            )?;
            Ok(())
        })
    }

    pub fn list_post_likes(&self, publication_id: &str) -> Result<Vec<PostLikeRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, publication_id, liked, method FROM post_likes
                 WHERE publication_id = ?1",
            )?;
            let rows = stmt
                .query_map([publication_id], |row| {
                    Ok(PostLikeRow {
                        id: row.get(0)?,
                        publication_id: row.get(1)?,
                        liked: row.get(2)?,
                        method: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn create_comment_like(
        &self,
        id: &str,
        comment_id: &str,
        method: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO comment_likes (id, comment_id, method) VALUES (?1, ?2, ?3)",
                params![id, comment_id, method],
            )?;
            Ok(())
        })
    }

    pub fn list_comment_likes(&self, comment_id: &str) -> Result<Vec<CommentLikeRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, comment_id, liked, method FROM comment_likes WHERE comment_id = ?1",
            )?;
            let rows = stmt
                .query_map([comment_id], |row| {
                    Ok(CommentLikeRow {
                        id: row.get(0)?,
                        comment_id: row.get(1)?,
                        liked: row.get(2)?,
                        method: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn map_publication(row: &rusqlite::Row<'_>) -> rusqlite::Result<PublicationRow> {
    Ok(PublicationRow {
        id: row.get(0)?,
        author_id: row.get(1)?,
        body: row.get(2)?,
        video: row.get(3)?,
        method: row.get(4)?,
    })
}

fn map_comment(row: &rusqlite::Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: row.get(0)?,
        publication_id: row.get(1)?,
        body: row.get(2)?,
        method: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_util::{db, user};
    use crate::DbError;
    use uuid::Uuid;

    fn publication(db: &crate::Database, author: &str) -> String {
        let id = Uuid::new_v4().to_string();
        db.create_publication(&id, author, "post body", None, None)
            .unwrap();
        id
    }

    #[test]
    fn feed_is_newest_first() {
        let db = db();
        let alice = user(&db, "alice@x.com");
        let first = publication(&db, &alice);
        let second = publication(&db, &alice);

        let feed = db.list_publications(10).unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].id, second);
        assert_eq!(feed[1].id, first);
        assert_eq!(db.list_user_publications(&alice).unwrap().len(), 2);
    }

    #[test]
    fn delete_publication_cascades_all_dependents() {
        let db = db();
        let alice = user(&db, "alice@x.com");
        let post = publication(&db, &alice);

        db.add_publication_photo(&Uuid::new_v4().to_string(), &post, "p.jpg", None)
            .unwrap();
        let comment = Uuid::new_v4().to_string();
        db.create_comment(&comment, &post, "nice", None).unwrap();
        db.create_reply(&Uuid::new_v4().to_string(), &comment, "thanks", None)
            .unwrap();
        db.create_post_like(&Uuid::new_v4().to_string(), &post, None)
            .unwrap();
        db.create_comment_like(&Uuid::new_v4().to_string(), &comment, None)
            .unwrap();

        db.delete_publication(&post).unwrap();

        assert!(db.get_publication(&post).unwrap().is_none());
        assert!(db.list_publication_photos(&post).unwrap().is_empty());
        assert!(db.list_comments(&post).unwrap().is_empty());
        assert!(db.list_post_likes(&post).unwrap().is_empty());
        // Transitive: comment went away, so its replies and likes did too.
        assert!(db.get_comment(&comment).unwrap().is_none());
        assert!(db.list_replies(&comment).unwrap().is_empty());
        assert!(db.list_comment_likes(&comment).unwrap().is_empty());
    }

    #[test]
    fn duplicate_likes_are_allowed() {
        let db = db();
        let alice = user(&db, "alice@x.com");
        let post = publication(&db, &alice);

        db.create_post_like(&Uuid::new_v4().to_string(), &post, None)
            .unwrap();
        db.create_post_like(&Uuid::new_v4().to_string(), &post, None)
            .unwrap();

        assert_eq!(db.list_post_likes(&post).unwrap().len(), 2);
    }

    #[test]
    fn comment_on_missing_publication_is_referential_error() {
        let db = db();
        let err = db
            .create_comment(
                &Uuid::new_v4().to_string(),
                &Uuid::new_v4().to_string(),
                "orphan",
                None,
            )
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKey(_)), "got {err:?}");
    }
}
