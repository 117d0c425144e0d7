use std::error::Error;

use diesel::{
    sql_query,
    sql_types::{Integer, Text},
    QueryableByName, RunQueryDsl, SqliteConnection,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::debug;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Schema version recorded in SQLite's `user_version` header field.
pub const SCHEMA_VERSION: i32 = 2;

type MigrationResult<T> = Result<T, Box<dyn Error + Send + Sync + 'static>>;

#[derive(QueryableByName)]
struct UserVersion {
    #[diesel(sql_type = Integer)]
    user_version: i32,
}

/// Runs pending migrations and brings `user_version` up to [`SCHEMA_VERSION`].
///
/// Stores written by older releases carry the `packages` table (and possibly
/// the `native` column) without any migration bookkeeping. Migrations whose
/// objects already exist are recorded as applied instead of failing, so those
/// stores are adopted with their rows intact.
pub fn apply_migrations(conn: &mut SqliteConnection) -> MigrationResult<()> {
    loop {
        match conn.run_pending_migrations(MIGRATIONS) {
            Ok(applied) => {
                if !applied.is_empty() {
                    debug!(count = applied.len(), "applied store migrations");
                }
                break;
            }
            Err(e) if is_already_applied(&e.to_string()) => {
                mark_first_pending(conn)?;
            }
            Err(e) => return Err(e),
        }
    }

    normalize_schema_version(conn)?;

    Ok(())
}

fn is_already_applied(message: &str) -> bool {
    message.contains("already exists") || message.contains("duplicate column name")
}

fn mark_first_pending(conn: &mut SqliteConnection) -> MigrationResult<()> {
    let pending = conn.pending_migrations(MIGRATIONS)?;
    if let Some(first) = pending.first() {
        debug!(version = %first.name().version(), "adopting existing schema object");
        sql_query("INSERT INTO __diesel_schema_migrations (version) VALUES (?1)")
            .bind::<Text, _>(first.name().version().to_string())
            .execute(conn)?;
    }

    Ok(())
}

/// Reads the persisted schema version.
pub fn schema_version(conn: &mut SqliteConnection) -> MigrationResult<i32> {
    let row: UserVersion = sql_query("PRAGMA user_version").get_result(conn)?;
    Ok(row.user_version)
}

fn normalize_schema_version(conn: &mut SqliteConnection) -> MigrationResult<()> {
    let current = schema_version(conn)?;
    if current < SCHEMA_VERSION {
        debug!(from = current, to = SCHEMA_VERSION, "updating schema version");
        sql_query(format!("PRAGMA user_version = {SCHEMA_VERSION}")).execute(conn)?;
    }

    Ok(())
}
