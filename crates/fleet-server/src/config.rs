//! Server configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_path: String,
    pub database_max_connections: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("FLEET_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            database_path: env::var("FLEET_DB_PATH")
                .unwrap_or_else(|_| "data/fleet.db".to_string()),
            database_max_connections: env::var("FLEET_DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
        }
    }
}
