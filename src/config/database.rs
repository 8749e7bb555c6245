//! Local store database configuration.
//!
//! Handles the `SQLite` connection behind the local durable store and creates the
//! `collections` table from its entity definition via `Schema::create_table_from_entity`,
//! so the schema always matches the Rust struct.

use crate::entities::Collection;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info};

/// Default location of the local store when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/jewel_cost.sqlite?mode=rwc";

/// Creates the parent directory of a file-backed `SQLite` URL.
///
/// `SQLite` creates the database file on demand but not the directory holding it.
/// In-memory and non-`SQLite` URLs are left alone.
pub fn ensure_sqlite_parent_dir(database_url: &str) -> Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let file = rest.split('?').next().unwrap_or_default();
    if file.is_empty() || file.contains(":memory:") {
        return Ok(());
    }
    if let Some(parent) = Path::new(file).parent().filter(|p| !p.as_os_str().is_empty()) {
        debug!("Ensuring local store directory exists: {:?}", parent);
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Connects to the local store at `database_url` and makes sure its tables exist.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    ensure_sqlite_parent_dir(database_url)?;
    let db = Database::connect(database_url).await?;
    create_tables(&db).await?;
    info!("Local store ready at {}", database_url);
    Ok(db)
}

/// Creates the `collections` table if it does not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut collection_table = schema.create_table_from_entity(Collection);
    collection_table.if_not_exists();

    db.execute(builder.build(&collection_table)).await?;
    Ok(())
}
