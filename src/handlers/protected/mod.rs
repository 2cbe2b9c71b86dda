// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every route here is mounted behind `jwt_auth_middleware`; handlers receive
// the caller's identity as an explicit `Extension<AuthUser>` argument.
pub mod companies;
pub mod leads;
pub mod utils;
pub mod whoami;

pub use companies::{companies_delete, companies_get, companies_list, companies_post, companies_put};
pub use leads::{leads_delete, leads_get, leads_list, leads_post, leads_put};
pub use whoami::whoami_get;
