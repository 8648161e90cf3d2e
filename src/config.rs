use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub rust_log: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    /// Username whose session is granted the admin surface.
    pub username: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()?;
        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let admin_username = env::var("ADMIN_USERNAME")?;

        Ok(Config {
            database: DatabaseConfig { url: database_url },
            server: ServerConfig {
                port,
                host,
                rust_log,
            },
            admin: AdminConfig {
                username: admin_username,
            },
        })
    }
}
