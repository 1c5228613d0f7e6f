use serde::Serialize;
use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{CommentKind, CommentStatus};

/// Database row for comments table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: String,
    pub goal_id: String,
    pub author_id: String,
    pub content: String,
    pub kind: CommentKind,
    pub status: CommentStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Data structure for inserting a new comment.
pub struct NewComment {
    pub id: String,
    pub goal_id: String,
    pub author_id: String,
    pub content: String,
    pub kind: CommentKind,
    pub status: CommentStatus,
}

/// Find a comment by ID.
pub async fn find_by_id<'e, E>(executor: E, id: &str) -> Result<Option<Comment>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Comment>(
        "SELECT id, goal_id, author_id, content, kind, status, created_at, updated_at FROM comments WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Comments on a goal, oldest first.
pub async fn find_by_goal<'e, E>(executor: E, goal_id: &str) -> Result<Vec<Comment>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Comment>(
        "SELECT id, goal_id, author_id, content, kind, status, created_at, updated_at FROM comments WHERE goal_id = ? ORDER BY created_at ASC, id ASC",
    )
    .bind(goal_id)
    .fetch_all(executor)
    .await
}

/// Insert a new comment.
pub async fn insert<'e, E>(executor: E, comment: &NewComment) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "INSERT INTO comments (id, goal_id, author_id, content, kind, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&comment.id)
    .bind(&comment.goal_id)
    .bind(&comment.author_id)
    .bind(&comment.content)
    .bind(comment.kind)
    .bind(comment.status)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Move a comment to a new status. Returns false if it does not exist.
pub async fn update_status<'e, E>(
    executor: E,
    id: &str,
    status: CommentStatus,
) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query("UPDATE comments SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
