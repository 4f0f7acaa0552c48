//! Selección del backend y metadatos de entorno para el diagnóstico.

use std::env;

use order_core::{EnvironmentInfo, InMemoryOrderStore, OrderStore};
use order_domain::SchemaLayout;
use order_persistence::config::url_host;
use order_persistence::{build_pool, DbConfig, PersistenceError, PgFlatOrderStore, PgNormalizedOrderStore, PoolProvider,
                        RestOrderStore};
use tracing::info;

use crate::cli::BackendKind;
use crate::settings::AppSettings;

pub type DynStore = Box<dyn OrderStore>;

pub fn open_store(settings: &AppSettings) -> Result<DynStore, PersistenceError> {
    let store: DynStore = match settings.backend {
        BackendKind::Memory => Box::new(InMemoryOrderStore::new(settings.layout)),
        BackendKind::Rest => Box::new(RestOrderStore::from_env()?),
        BackendKind::Postgres => {
            let cfg = DbConfig::from_env()?;
            let pool = build_pool(&cfg.url, cfg.min_connections, cfg.max_connections, settings.layout)?;
            let provider = PoolProvider { pool };
            match settings.layout {
                SchemaLayout::Normalized => Box::new(PgNormalizedOrderStore::new(provider)),
                SchemaLayout::Flat => Box::new(PgFlatOrderStore::new(provider)),
            }
        }
    };
    info!(backend = store.backend_name(), layout = %store.layout(), "store ready");
    Ok(store)
}

/// Metadatos sin abrir conexiones; nunca falla.
pub fn environment(settings: &AppSettings) -> EnvironmentInfo {
    let var = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());
    let (target, api_key_present) = match settings.backend {
        BackendKind::Memory => ("memoria".to_string(), None),
        BackendKind::Postgres => (var("DATABASE_URL").map(|u| url_host(&u))
                                                     .unwrap_or_else(|| "DATABASE_URL no definido".to_string()),
                                  None),
        BackendKind::Rest => (var("SUPABASE_URL").map(|u| url_host(&u))
                                                 .unwrap_or_else(|| "SUPABASE_URL no definido".to_string()),
                              Some(var("SUPABASE_ANON_KEY").is_some())),
    };
    EnvironmentInfo { mode: settings.mode.clone(),
                      backend: settings.backend.as_str().to_string(),
                      layout: settings.layout.to_string(),
                      target,
                      base_path: settings.base_path.clone(),
                      api_key_present }
}
