use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};

use crate::db::models::{NewPost, Post, PostStatus};
use crate::error::CafeError;

pub type SqlitePool = Pool<Sqlite>;

const POST_COLUMNS: &str = "id, title, body, author, status, tags, created_at, updated_at";

#[derive(Clone)]
pub struct PostStorage {
    pool: SqlitePool,
}

impl PostStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new post and return the stored row, id assigned.
    pub async fn insert(&self, new: NewPost) -> Result<Post, CafeError> {
        let tags_json =
            serde_json::to_string(&new.tags).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO posts (title, body, author, status, tags, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.title)
        .bind(new.body)
        .bind(new.author)
        .bind(new.status.as_str())
        .bind(tags_json)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(result.last_insert_rowid()).await
    }

    /// All posts, newest first.
    pub async fn find_all(&self) -> Result<Vec<Post>, CafeError> {
        let rows = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(row_to_model).collect()
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Post, CafeError> {
        let row = sqlx::query(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?"))
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found_or_db)?;
        row_to_model(row)
    }

    /// Replace all mutable fields of a post. `NotFound` if the id is absent.
    pub async fn update_by_id(&self, id: i64, post: NewPost) -> Result<Post, CafeError> {
        let tags_json =
            serde_json::to_string(&post.tags).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"UPDATE posts SET
                title = ?,
                body = ?,
                author = ?,
                status = ?,
                tags = ?,
                updated_at = ?
              WHERE id = ?"#,
        )
        .bind(post.title)
        .bind(post.body)
        .bind(post.author)
        .bind(post.status.as_str())
        .bind(tags_json)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CafeError::NotFound);
        }
        self.find_by_id(id).await
    }

    /// Hard delete. `NotFound` if the id is absent.
    pub async fn delete_by_id(&self, id: i64) -> Result<(), CafeError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(CafeError::NotFound);
        }
        Ok(())
    }
}

fn not_found_or_db(e: sqlx::Error) -> CafeError {
    match e {
        sqlx::Error::RowNotFound => CafeError::NotFound,
        other => CafeError::Database(other),
    }
}

fn row_to_model(row: SqliteRow) -> Result<Post, CafeError> {
    let id: i64 = row.try_get("id")?;
    let title: String = row.try_get("title")?;
    let body: String = row.try_get("body")?;
    let author: Option<String> = row.try_get("author")?;
    let status_str: String = row.try_get("status")?;
    let tags_json: String = row.try_get("tags")?;
    let created_str: String = row.try_get("created_at")?;
    let updated_str: String = row.try_get("updated_at")?;

    let status = PostStatus::parse(&status_str).ok_or_else(|| {
        CafeError::Database(sqlx::Error::Decode(
            format!("unknown post status: {status_str}").into(),
        ))
    })?;
    let tags: Vec<String> =
        serde_json::from_str(&tags_json).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    let created_at = parse_rfc3339(&created_str)?;
    let updated_at = parse_rfc3339(&updated_str)?;

    Ok(Post {
        id,
        title,
        body,
        author,
        status,
        tags,
        created_at,
        updated_at,
    })
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, CafeError> {
    Ok(chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
        .with_timezone(&Utc))
}
