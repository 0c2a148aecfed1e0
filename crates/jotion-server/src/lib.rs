pub mod auth;
pub mod config;
pub mod db;
pub mod documents;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod store;

pub use config::Config;
pub use db::DbPool;
pub use error::AppError;
pub use routes::{create_router, AppState};
