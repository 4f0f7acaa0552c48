//! Migraciones embebidas. Cada esquema tiene su propio set; una base guarda
//! uno solo de los dos. Se ejecutan una vez al construir el pool.

use diesel::pg::PgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::debug;
use order_domain::SchemaLayout;

use crate::error::PersistenceError;

pub const NORMALIZED_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/normalized");
pub const FLAT_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/flat");

pub fn migrations_for(layout: SchemaLayout) -> EmbeddedMigrations {
    match layout {
        SchemaLayout::Normalized => NORMALIZED_MIGRATIONS,
        SchemaLayout::Flat => FLAT_MIGRATIONS,
    }
}

/// Corre las migraciones pendientes del esquema y devuelve cuántas aplicó.
pub fn run_pending_migrations(conn: &mut PgConnection, layout: SchemaLayout) -> Result<usize, PersistenceError> {
    let applied = conn.run_pending_migrations(migrations_for(layout))
                      .map_err(|e| PersistenceError::Unknown(format!("migration error: {e}")))?;
    debug!("migrations layout={layout} applied={}", applied.len());
    Ok(applied.len())
}
