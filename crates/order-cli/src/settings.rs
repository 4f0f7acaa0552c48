//! Ajustes del binario: backend, esquema, modo y base path.

use std::env;

use order_domain::SchemaLayout;

use crate::cli::{BackendKind, Cli};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub backend: BackendKind,
    pub layout: SchemaLayout,
    /// `ORDERS_MODE`, `development` por defecto.
    pub mode: String,
    /// `ORDERS_BASE_PATH`, `/` por defecto. Sólo se reporta en diagnóstico.
    pub base_path: String,
}

fn non_empty_env(name: &str) -> Option<String> { env::var(name).ok().filter(|v| !v.trim().is_empty()) }

/// Backend explícito o, si no hay, el primero configurado.
pub fn resolve_backend(explicit: Option<BackendKind>, has_database_url: bool, has_rest_url: bool) -> BackendKind {
    match explicit {
        Some(kind) => kind,
        None if has_database_url => BackendKind::Postgres,
        None if has_rest_url => BackendKind::Rest,
        None => BackendKind::Memory,
    }
}

impl AppSettings {
    pub fn from_cli(cli: &Cli) -> Self {
        let backend = resolve_backend(cli.backend,
                                      non_empty_env("DATABASE_URL").is_some(),
                                      non_empty_env("SUPABASE_URL").is_some());
        // El API REST sólo sirve la tabla plana.
        let layout = match backend {
            BackendKind::Rest => SchemaLayout::Flat,
            _ => cli.layout.unwrap_or_default(),
        };
        Self { backend,
               layout,
               mode: non_empty_env("ORDERS_MODE").unwrap_or_else(|| "development".to_string()),
               base_path: non_empty_env("ORDERS_BASE_PATH").unwrap_or_else(|| "/".to_string()) }
    }
}
