use axum::{http::StatusCode, middleware::from_fn, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod validation;

pub fn app() -> Router {
    let config = config::config();

    let mut app = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // API routes
        .merge(auth_routes())
        .merge(post_routes());

    // Global middleware
    if config.security.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }
    app
}

fn auth_routes() -> Router {
    use axum::routing::post;
    use handlers::auth;
    use middleware::{auth_guard, validate_login, validate_signup};

    let signup = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route_layer(from_fn(validate_signup));

    let login = Router::new()
        .route("/auth/login", post(auth::login))
        .route_layer(from_fn(validate_login));

    let me = Router::new()
        .route("/auth/me", post(auth::me))
        .route_layer(from_fn(auth_guard));

    signup.merge(login).merge(me)
}

fn post_routes() -> Router {
    use axum::routing::{get, post, put};
    use handlers::posts;
    use middleware::{auth_guard, validate_post};

    // Body-carrying routes run the text rule chain ahead of the auth guard
    // (outermost route_layer is added last and runs first).
    let writes = Router::new()
        .route("/post", post(posts::create))
        .route("/post/:id", put(posts::update))
        .route_layer(from_fn(auth_guard))
        .route_layer(from_fn(validate_post));

    let guarded = Router::new()
        .route("/post", get(posts::list))
        .route("/post/:id", get(posts::get).delete(posts::delete))
        .route_layer(from_fn(auth_guard));

    writes.merge(guarded)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Quill API",
            "version": version,
            "description": "Minimal blog backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "signup": "POST /auth/signup (public)",
                "login": "POST /auth/login (public)",
                "me": "POST /auth/me (bearer token)",
                "posts": "GET|POST /post, GET|PUT|DELETE /post/:id (bearer token)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
