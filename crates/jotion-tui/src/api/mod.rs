mod auth;
mod client;

pub use client::{ApiClient, ApiError};
