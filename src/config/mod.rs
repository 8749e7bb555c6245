/// Seed catalog loading from catalog.toml
pub mod catalog;

/// Local store connection and table creation
pub mod database;

/// Environment-driven application settings
pub mod settings;
