use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. Without it documents live in memory.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    /// Lifetime of development tokens minted by `issue-token`, in seconds.
    pub jwt_expires_in: i64,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_expires_in: env::var("JWT_EXPIRES_IN")
                .unwrap_or_else(|_| "86400".to_string()) // 1 day
                .parse()
                .context("JWT_EXPIRES_IN must be a number of seconds")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid port number")?,
        })
    }
}
