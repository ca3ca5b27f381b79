use crate::data::{FOREIGN_KEY_VIOLATION, missing_pk_message, sql_state};
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: Comment) -> Result<Comment, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError>;
    /// Oldest first, optionally restricted to one post.
    async fn list(&self, post_id: Option<Uuid>) -> Result<Vec<Comment>, DomainError>;
    async fn list_ids_by_author(&self, author_id: Uuid) -> Result<Vec<Uuid>, DomainError>;
    async fn update_text(&self, id: Uuid, comment_text: String)
    -> Result<Option<Comment>, DomainError>;
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

#[derive(Clone)]
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COMMENT: &str = r#"
    SELECT c.id, c.post_id, c.author_id, u.username AS author_username,
           c.comment_text, c.created_date
    FROM comments c
    LEFT JOIN users u ON u.id = c.author_id
"#;

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, comment: Comment) -> Result<Comment, DomainError> {
        let post_id = comment.post_id;
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            WITH c AS (
                INSERT INTO comments (id, post_id, author_id, comment_text, created_date)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, post_id, author_id, comment_text, created_date
            )
            SELECT c.id, c.post_id, c.author_id, u.username AS author_username,
                   c.comment_text, c.created_date
            FROM c
            LEFT JOIN users u ON u.id = c.author_id
            "#,
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(&comment.comment_text)
        .bind(comment.created_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if sql_state(&e).as_deref() == Some(FOREIGN_KEY_VIOLATION) {
                // The post vanished between the existence check and the insert.
                DomainError::field("post", missing_pk_message(post_id))
            } else {
                error!("failed to create comment: {}", e);
                DomainError::Internal(format!("database error: {}", e))
            }
        })?;

        info!(
            comment_id = %comment.id,
            post_id = %comment.post_id,
            summary = %comment,
            "comment created"
        );
        Ok(comment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError> {
        let sql = format!("{SELECT_COMMENT} WHERE c.id = $1");
        sqlx::query_as::<_, Comment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error find comment {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })
    }

    async fn list(&self, post_id: Option<Uuid>) -> Result<Vec<Comment>, DomainError> {
        let sql = format!(
            "{SELECT_COMMENT} WHERE ($1::uuid IS NULL OR c.post_id = $1) ORDER BY c.created_date, c.id"
        );
        sqlx::query_as::<_, Comment>(&sql)
            .bind(post_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching comments: {}", e);
                DomainError::Internal(e.to_string())
            })
    }

    async fn list_ids_by_author(&self, author_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM comments WHERE author_id = $1 ORDER BY created_date, id",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching comments of {}: {}", author_id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn update_text(
        &self,
        id: Uuid,
        comment_text: String,
    ) -> Result<Option<Comment>, DomainError> {
        let updated = sqlx::query("UPDATE comments SET comment_text = $1 WHERE id = $2")
            .bind(&comment_text)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to update comment {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        info!(comment_id = %id, "comment updated");
        self.find_by_id(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete comment {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;

        if deleted.rows_affected() > 0 {
            info!(comment_id = %id, "comment deleted");
        }
        Ok(deleted.rows_affected() > 0)
    }
}
