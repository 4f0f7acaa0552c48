//! order-persistence
//!
//! Backends durables de `OrderStore`:
//! - `pg`: Postgres vía Diesel, un store por esquema (`normalized`, `flat`).
//! - `rest`: tabla plana sobre el API REST de Supabase (feature `rest`).
//! - `migrations`: migraciones embebidas, un set por esquema.
//! - `config`: configuración desde `.env` / entorno.
//! - `schema`: tablas Diesel de ambos esquemas.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pg;
#[cfg(feature = "rest")]
pub mod rest;
pub mod schema;

pub use config::{init_dotenv, DbConfig, RestConfig};
pub use error::PersistenceError;
pub use pg::{build_pool, build_pool_from_env, ConnectionProvider, PgFlatOrderStore, PgNormalizedOrderStore, PgPool,
             PoolProvider};
#[cfg(feature = "rest")]
pub use rest::RestOrderStore;
