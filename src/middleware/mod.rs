pub mod auth;
pub mod response;

pub use auth::{authorize, jwt_auth_middleware, AuthRejection, AuthUser};
pub use response::{ApiResponse, ApiResult};
