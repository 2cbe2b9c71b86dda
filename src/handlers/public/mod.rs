// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and status probes. Everything else lives behind the
// bearer-token gate in `handlers::protected`.
pub mod health;
pub mod login;
pub mod root;

pub use health::health_get;
pub use login::login_post;
pub use root::root_get;
