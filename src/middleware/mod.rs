pub mod auth;
pub mod response;
pub mod validate;

pub use auth::{auth_guard, AuthUser};
pub use response::{ApiResponse, ApiResult};
pub use validate::{validate_login, validate_post, validate_signup};
