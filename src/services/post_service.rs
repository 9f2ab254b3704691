use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseManager, DatabaseError};
use crate::database::models::Post;

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("post not found: {0}")]
    NotFound(Uuid),
    #[error("post {0} belongs to another user")]
    NotOwner(Uuid),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Query(#[from] sqlx::Error),
}

pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub async fn new() -> Result<Self, PostError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// List posts newest-first, optionally restricted to one author's handle.
    pub async fn list(&self, author: Option<&str>) -> Result<Vec<Post>, PostError> {
        let posts = match author {
            Some(userid) => {
                sqlx::query_as::<_, Post>(
                    r#"
                    SELECT p.id, p.text, u.userid, p.user_id, p.created_at, p.updated_at
                    FROM posts p
                    JOIN users u ON u.id = p.user_id
                    WHERE u.userid = $1
                    ORDER BY p.created_at DESC
                    "#,
                )
                .bind(userid)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Post>(
                    r#"
                    SELECT p.id, p.text, u.userid, p.user_id, p.created_at, p.updated_at
                    FROM posts p
                    JOIN users u ON u.id = p.user_id
                    ORDER BY p.created_at DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(posts)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, PostError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT p.id, p.text, u.userid, p.user_id, p.created_at, p.updated_at
            FROM posts p
            JOIN users u ON u.id = p.user_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(post)
    }

    pub async fn create(&self, user_id: Uuid, text: &str) -> Result<Post, PostError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            WITH inserted AS (
                INSERT INTO posts (user_id, text)
                VALUES ($1, $2)
                RETURNING *
            )
            SELECT i.id, i.text, u.userid, i.user_id, i.created_at, i.updated_at
            FROM inserted i
            JOIN users u ON u.id = i.user_id
            "#,
        )
        .bind(user_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Created post {} by {}", post.id, post.userid);
        Ok(post)
    }

    /// Replace a post's text. Only the author may update.
    pub async fn update(&self, id: Uuid, user_id: Uuid, text: &str) -> Result<Post, PostError> {
        self.check_ownership(id, user_id).await?;

        let post = sqlx::query_as::<_, Post>(
            r#"
            WITH updated AS (
                UPDATE posts
                SET text = $1, updated_at = now()
                WHERE id = $2
                RETURNING *
            )
            SELECT u2.id, u2.text, u.userid, u2.user_id, u2.created_at, u2.updated_at
            FROM updated u2
            JOIN users u ON u.id = u2.user_id
            "#,
        )
        .bind(text)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    /// Delete a post. Only the author may delete.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), PostError> {
        self.check_ownership(id, user_id).await?;

        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!("Deleted post {}", id);
        Ok(())
    }

    /// NotFound if the post does not exist, NotOwner if it belongs to someone
    /// else. Reads stay open to any authenticated user; writes do not.
    async fn check_ownership(&self, id: Uuid, user_id: Uuid) -> Result<(), PostError> {
        let owner: Option<(Uuid,)> =
            sqlx::query_as("SELECT user_id FROM posts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        match owner {
            None => Err(PostError::NotFound(id)),
            Some((owner_id,)) if owner_id != user_id => Err(PostError::NotOwner(id)),
            Some(_) => Ok(()),
        }
    }
}
