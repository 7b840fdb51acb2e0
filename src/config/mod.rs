/// Application settings loaded from config.toml and the environment
pub mod app;

/// Database configuration and connection management
pub mod database;

/// Admin accounts seeded from config.toml
pub mod users;
