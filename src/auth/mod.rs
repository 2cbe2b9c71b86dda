pub mod login;
pub mod password;
pub mod token;

pub use login::{login, LoginError, LoginRequest, LoginResponse};
pub use password::{hash_password, verify_password, PasswordError};
pub use token::{SessionClaims, TokenError, TokenService, TOKEN_TTL_SECS};
