use axum::{extract::Extension, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, Claims};
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::user_service::{NewUser, UserService};

/// Body for POST /auth/signup. Field rules have already run in the
/// validation chain; the payload arrives trimmed.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub userid: String,
    pub password: String,
    pub name: String,
    pub email: String,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub userid: String,
    pub password: String,
}

/// POST /auth/signup - create an account and issue a token
pub async fn signup(Json(payload): Json<SignupRequest>) -> ApiResult<Value> {
    let service = UserService::new().await?;

    let user = service
        .create_user(NewUser {
            userid: payload.userid,
            password: payload.password,
            name: payload.name,
            email: payload.email,
            url: payload.url,
        })
        .await?;

    let token = auth::generate_token(&Claims::for_user(&user))?;

    Ok(ApiResponse::created(json!({
        "id": user.id,
        "token": token,
    })))
}

/// POST /auth/login - authenticate a userid + password pair
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<Value> {
    let service = UserService::new().await?;

    let user = service
        .authenticate(&payload.userid, &payload.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("invalid userid or password"))?;

    let token = auth::generate_token(&Claims::for_user(&user))?;

    Ok(ApiResponse::success(json!({
        "token": token,
        "user": user,
    })))
}

/// POST /auth/me - resolve the current identity from the bearer token
pub async fn me(Extension(auth_user): Extension<AuthUser>) -> ApiResult<User> {
    let service = UserService::new().await?;

    // Re-resolve against the store so a deleted account stops authenticating
    // even while its token is still within its expiry window.
    let user = service
        .find_by_id(auth_user.user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("account no longer exists"))?;

    Ok(ApiResponse::success(user))
}
