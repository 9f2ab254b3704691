use sqlx::PgPool;
use uuid::Uuid;

use crate::auth;
use crate::database::manager::{DatabaseManager, DatabaseError};
use crate::database::models::User;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("userid already taken: {0}")]
    UseridTaken(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Query(#[from] sqlx::Error),
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

/// Fields accepted at signup. The password arrives in plaintext and is hashed
/// before it touches the store.
#[derive(Debug)]
pub struct NewUser {
    pub userid: String,
    pub password: String,
    pub name: String,
    pub email: String,
    pub url: Option<String>,
}

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub async fn new() -> Result<Self, UserError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// Create a user. The handle is pre-checked so the common duplicate case
    /// gets a clean conflict; the unique index covers the race window.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, UserError> {
        if self.find_by_userid(&new_user.userid).await?.is_some() {
            return Err(UserError::UseridTaken(new_user.userid));
        }

        let password_hash = auth::hash_password(&new_user.password)
            .map_err(|e| UserError::PasswordHash(e.to_string()))?;

        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (userid, name, email, password_hash, url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&new_user.userid)
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&password_hash)
        .bind(&new_user.url)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => {
                tracing::info!("Created user {} ({})", user.userid, user.id);
                Ok(user)
            }
            Err(sqlx::Error::Database(db_err))
                if db_err.constraint() == Some("users_userid_key") =>
            {
                Err(UserError::UseridTaken(new_user.userid))
            }
            Err(e) => Err(UserError::Query(e)),
        }
    }

    /// Authenticate a userid + password pair. Unknown handle and wrong
    /// password both come back as `None`; the caller cannot tell them apart.
    pub async fn authenticate(
        &self,
        userid: &str,
        password: &str,
    ) -> Result<Option<User>, UserError> {
        let Some(user) = self.find_by_userid(userid).await? else {
            return Ok(None);
        };

        if auth::verify_password(password, &user.password_hash) {
            Ok(Some(user))
        } else {
            tracing::warn!("Failed login attempt for {}", userid);
            Ok(None)
        }
    }

    pub async fn find_by_userid(&self, userid: &str) -> Result<Option<User>, UserError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE userid = $1")
            .bind(userid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}
