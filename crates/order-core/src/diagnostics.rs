//! Diagnóstico de conexión: una sonda de sólo lectura más los metadatos del
//! entorno, y la lista de problemas detectados a partir de ambos.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::OrderStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentInfo {
    /// `development` / `production`.
    pub mode: String,
    pub backend: String,
    pub layout: String,
    /// Host de la base o URL del API REST.
    pub target: String,
    pub base_path: String,
    /// Sólo aplica al backend REST.
    pub api_key_present: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum Connectivity {
    Connected,
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct DebugReport {
    pub environment: EnvironmentInfo,
    pub connectivity: Connectivity,
    pub issues: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl DebugReport {
    /// Lanza una única sonda contra el backend y arma el reporte.
    pub fn gather<S: OrderStore + ?Sized>(store: &S, environment: EnvironmentInfo, now: DateTime<Utc>) -> Self {
        let connectivity = match store.probe() {
            Ok(()) => Connectivity::Connected,
            Err(e) => Connectivity::Failed(e.to_string()),
        };
        let issues = detect_issues(&environment, &connectivity);
        Self { environment,
               connectivity,
               issues,
               generated_at: now }
    }

    pub fn is_healthy(&self) -> bool { self.connectivity == Connectivity::Connected && self.issues.is_empty() }

    /// El panel se muestra en desarrollo o cuando algo falla.
    pub fn should_show(&self) -> bool { self.environment.mode != "production" || !self.is_healthy() }

    pub fn render(&self) -> String {
        let env = &self.environment;
        let mut out = String::new();
        let _ = writeln!(out, "Modo:         {}", env.mode);
        let _ = writeln!(out, "Backend:      {}", env.backend);
        let _ = writeln!(out, "Esquema:      {}", env.layout);
        let _ = writeln!(out, "Destino:      {}", env.target);
        let _ = writeln!(out, "Base path:    {}", env.base_path);
        if let Some(present) = env.api_key_present {
            let _ = writeln!(out, "API key:      {}", if present { "presente" } else { "faltante" });
        }
        match &self.connectivity {
            Connectivity::Connected => {
                let _ = writeln!(out, "Conexión:     ✅ conectado");
            }
            Connectivity::Failed(msg) => {
                let _ = writeln!(out, "Conexión:     ❌ {msg}");
            }
        }
        if self.issues.is_empty() {
            let _ = writeln!(out, "Problemas:    ninguno");
        } else {
            let _ = writeln!(out, "Problemas:");
            for issue in &self.issues {
                let _ = writeln!(out, "  - {issue}");
            }
        }
        let _ = write!(out, "Generado:     {}", self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
        out
    }
}

fn detect_issues(env: &EnvironmentInfo, connectivity: &Connectivity) -> Vec<String> {
    let mut issues = Vec::new();
    if let Connectivity::Failed(msg) = connectivity {
        issues.push(format!("No se pudo conectar con el backend: {msg}"));
    }
    if env.mode == "production" && (env.target.contains("localhost") || env.target.contains("127.0.0.1")) {
        issues.push("El destino apunta a localhost en producción".to_string());
    }
    if env.mode == "production" && env.base_path == "/" {
        issues.push("Base path es \"/\"; el hosting estático bajo subruta necesita la ruta del repositorio".to_string());
    }
    if env.api_key_present == Some(false) {
        issues.push("Falta la API key del backend REST".to_string());
    }
    issues
}
