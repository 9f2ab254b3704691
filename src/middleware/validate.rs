use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::header::CONTENT_LENGTH,
    middleware::Next,
    response::Response,
};
use serde_json::Value;

use crate::config;
use crate::error::ApiError;
use crate::validation::{RuleChain, LOGIN_CHAIN, POST_CHAIN, SIGNUP_CHAIN};

/// Signup body: userid, password, name, email.
pub async fn validate_signup(request: Request, next: Next) -> Result<Response, ApiError> {
    run_chain(&SIGNUP_CHAIN, request, next).await
}

/// Login body: userid, password.
pub async fn validate_login(request: Request, next: Next) -> Result<Response, ApiError> {
    run_chain(&LOGIN_CHAIN, request, next).await
}

/// Post create/update body: text.
pub async fn validate_post(request: Request, next: Next) -> Result<Response, ApiError> {
    run_chain(&POST_CHAIN, request, next).await
}

/// Buffer the JSON body, run the declared rule chain against it, and pass the
/// request on with the sanitized (trimmed) body. The first failing rule
/// short-circuits with 400 before any downstream stage runs.
async fn run_chain(
    chain: &'static RuleChain,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let limit = config::config().api.max_request_size_bytes;
    let (mut parts, body) = request.into_parts();

    let bytes = to_bytes(body, limit)
        .await
        .map_err(|e| ApiError::invalid_json(format!("unable to read request body: {}", e)))?;

    let mut value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::invalid_json(format!("request body is not valid JSON: {}", e)))?;

    chain.apply(&mut value).map_err(ApiError::validation)?;

    let sanitized = serde_json::to_vec(&value)
        .map_err(|e| ApiError::internal_server_error(format!("body rewrite failed: {}", e)))?;

    // Content-Length no longer matches the rewritten body
    parts.headers.remove(CONTENT_LENGTH);
    let request = Request::from_parts(parts, Body::from(sanitized));

    Ok(next.run(request).await)
}
