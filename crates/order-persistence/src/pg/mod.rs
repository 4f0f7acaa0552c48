//! Implementaciones Postgres (Diesel) de `OrderStore`.
//!
//! - `PgNormalizedOrderStore`: `orders` + `order_accessories`, un id por orden.
//! - `PgFlatOrderStore`: una fila por accesorio en `orders`, agrupadas por
//!   `order_number` al leer.
//!
//! Ambos mantienen paridad con `InMemoryOrderStore`:
//! - Orden de salida: fecha descendente y, a igual fecha, id ascendente.
//! - Búsqueda con las mismas coincidencias, devolviendo órdenes completas.
//!
//! Sin reintentos: el error sube tal cual.

mod flat;
mod normalized;

use diesel::pg::PgConnection;
use diesel::r2d2::{self, ConnectionManager};
use log::{debug, warn};
use order_domain::SchemaLayout;

use crate::config::DbConfig;
use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;

pub use flat::PgFlatOrderStore;
pub use normalized::PgNormalizedOrderStore;

/// Pool r2d2 de conexiones Postgres.
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub type PgPooledConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

/// Proveedor abstracto de conexiones: un pool real en producción y en los
/// tests de integración.
pub trait ConnectionProvider: Send + Sync + 'static {
    fn connection(&self) -> Result<PgPooledConnection, PersistenceError>;
}

/// `ConnectionProvider` respaldado por un `PgPool`.
#[derive(Clone)]
pub struct PoolProvider {
    pub pool: PgPool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<PgPooledConnection, PersistenceError> {
        self.pool
            .get()
            .map_err(|e| PersistenceError::Connection(format!("pool error: {e}")))
    }
}

/// Construye el pool y corre las migraciones del esquema una sola vez.
///
/// - Tamaños en cero se elevan a uno; si `min > max` se usa `min = max`.
/// - Errores del pool/manager → `PersistenceError::Connection`.
pub fn build_pool(database_url: &str, min_size: u32, max_size: u32, layout: SchemaLayout) -> Result<PgPool, PersistenceError> {
    let validated_min = min_size.max(1);
    let validated_max = max_size.max(1);
    if validated_min > validated_max {
        warn!("min_size > max_size ({validated_min} > {validated_max}), ajustando min=max");
    }
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().min_idle(Some(validated_min.min(validated_max)))
                                    .max_size(validated_max)
                                    .build(manager)
                                    .map_err(|e| PersistenceError::Connection(format!("pool build: {e}")))?;
    {
        let mut conn = pool.get()
                           .map_err(|e| PersistenceError::Connection(format!("pool get for migrations: {e}")))?;
        run_pending_migrations(&mut conn, layout)?;
    }
    debug!("pool ready layout={layout} max={validated_max}");
    Ok(pool)
}

/// Carga `.env`, lee `DbConfig` y construye un pool ya migrado.
pub fn build_pool_from_env() -> Result<(PgPool, DbConfig), PersistenceError> {
    let cfg = DbConfig::from_env()?;
    let pool = build_pool(&cfg.url, cfg.min_connections, cfg.max_connections, cfg.layout)?;
    Ok((pool, cfg))
}

/// Escapa `%`, `_` y `\` para usar el término dentro de un patrón ILIKE.
pub(crate) fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `%término%` con el término escapado.
pub(crate) fn contains_pattern(term: &str) -> String { format!("%{}%", escape_like(term)) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(contains_pattern("bolsa"), "%bolsa%");
    }
}
