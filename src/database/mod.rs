pub mod credentials;
pub mod manager;
pub mod models;
pub mod query_builder;
pub mod repository;
pub mod resource;

pub use credentials::CredentialStore;
pub use manager::{Database, DatabaseError};
pub use repository::Repository;
pub use resource::Resource;
