use axum::{
    extract::{Extension, Path, Query},
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Post;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::PostService;

/// Body for POST /post and PUT /post/:id; text is trimmed by the chain.
#[derive(Debug, Deserialize)]
pub struct PostBody {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Restrict the listing to one author's handle
    pub userid: Option<String>,
}

/// GET /post - list posts, newest first
pub async fn list(Query(query): Query<ListQuery>) -> ApiResult<Vec<Post>> {
    let service = PostService::new().await?;
    let posts = service.list(query.userid.as_deref()).await?;
    Ok(ApiResponse::success(posts))
}

/// GET /post/:id - fetch one post
pub async fn get(Path(id): Path<Uuid>) -> ApiResult<Post> {
    let service = PostService::new().await?;
    let post = service
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("post {} not found", id)))?;
    Ok(ApiResponse::success(post))
}

/// POST /post - create a post under the authenticated identity
pub async fn create(
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<PostBody>,
) -> ApiResult<Post> {
    let service = PostService::new().await?;
    let post = service.create(auth_user.user_id, &payload.text).await?;
    Ok(ApiResponse::created(post))
}

/// PUT /post/:id - replace a post's text (author only)
pub async fn update(
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PostBody>,
) -> ApiResult<Post> {
    let service = PostService::new().await?;
    let post = service.update(id, auth_user.user_id, &payload.text).await?;
    Ok(ApiResponse::success(post))
}

/// DELETE /post/:id - delete a post (author only)
pub async fn delete(
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let service = PostService::new().await?;
    service.delete(id, auth_user.user_id).await?;
    Ok(ApiResponse::<()>::no_content())
}
