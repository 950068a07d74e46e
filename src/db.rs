use anyhow::{Context, Result, anyhow};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

// Embed migrations into the binary
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Opens (or creates) the SQLite rule store at `database_path`.
pub fn establish_connection(database_path: &str) -> Result<SqliteConnection> {
    let mut conn = SqliteConnection::establish(database_path)
        .with_context(|| format!("Failed to open SQLite database at {database_path}"))?;
    enable_foreign_keys(&mut conn)?;
    Ok(conn)
}

/// In-memory store with the schema already applied.
pub fn open_in_memory() -> Result<SqliteConnection> {
    let mut conn = establish_connection(":memory:")?;
    run_migrations(&mut conn)?;
    Ok(conn)
}

/// Creates every table of the rule store. Safe to call on an existing database.
pub fn run_migrations(conn: &mut SqliteConnection) -> Result<Vec<String>> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!("Failed to run database migrations: {e}"))?
        .into_iter()
        .map(|version| version.to_string())
        .collect::<Vec<_>>();

    if applied.is_empty() {
        info!("Schema is up to date");
    } else {
        info!("Applied {} migration(s)", applied.len());
    }

    Ok(applied)
}

fn enable_foreign_keys(conn: &mut SqliteConnection) -> Result<()> {
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(conn)
        .context("Failed to enable foreign key enforcement")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let mut conn = open_in_memory().unwrap();
        let applied = run_migrations(&mut conn).unwrap();
        assert!(applied.is_empty());
    }
}
