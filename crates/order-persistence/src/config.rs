//! Carga de configuración desde variables de entorno.
//! `DATABASE_URL` + tamaños de pool + esquema; `SUPABASE_URL` +
//! `SUPABASE_ANON_KEY` para el backend REST.

use std::env;

use dotenvy::dotenv;
use once_cell::sync::Lazy;
use order_domain::SchemaLayout;

use crate::error::PersistenceError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

/// Forzar carga temprana de .env desde aplicaciones externas.
pub fn init_dotenv() { Lazy::force(&DOTENV_LOADED); }

fn required(name: &str) -> Result<String, PersistenceError> {
    env::var(name).ok()
                  .filter(|v| !v.trim().is_empty())
                  .ok_or_else(|| PersistenceError::Config(format!("{name} no definido")))
}

fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Esquema desde `ORDERS_SCHEMA_LAYOUT`; `flat` si no está definido.
pub fn layout_from_env() -> Result<SchemaLayout, PersistenceError> {
    init_dotenv();
    match env::var("ORDERS_SCHEMA_LAYOUT") {
        Ok(raw) if !raw.trim().is_empty() => raw.parse().map_err(|e: order_domain::DomainError| {
                                                             PersistenceError::Config(e.to_string())
                                                         }),
        _ => Ok(SchemaLayout::default()),
    }
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub layout: SchemaLayout,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, PersistenceError> {
        init_dotenv();
        let url = required("DATABASE_URL")?;
        let min_connections = parsed_or("DATABASE_MIN_CONNECTIONS", 2);
        let max_connections = parsed_or("DATABASE_MAX_CONNECTIONS", 16);
        let layout = layout_from_env()?;
        Ok(Self { url,
                  min_connections,
                  max_connections,
                  layout })
    }

    /// Host de la URL, sin credenciales (para diagnóstico y logs).
    pub fn host(&self) -> String { url_host(&self.url) }
}

#[derive(Clone)]
pub struct RestConfig {
    pub url: String,
    pub anon_key: String,
}

impl RestConfig {
    pub fn from_env() -> Result<Self, PersistenceError> {
        init_dotenv();
        Ok(Self { url: required("SUPABASE_URL")?.trim_end_matches('/').to_string(),
                  anon_key: required("SUPABASE_ANON_KEY")? })
    }

    pub fn host(&self) -> String { url_host(&self.url) }
}

// La key nunca se imprime.
impl std::fmt::Debug for RestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestConfig").field("url", &self.url).field("anon_key", &"***").finish()
    }
}

/// `postgres://user:pw@db.example:5432/app` → `db.example:5432`.
pub fn url_host(url: &str) -> String {
    let rest = url.split_once("://").map(|(_, r)| r).unwrap_or(url);
    let authority = rest.split(['/', '?']).next().unwrap_or(rest);
    authority.rsplit_once('@').map(|(_, h)| h).unwrap_or(authority).to_string()
}
