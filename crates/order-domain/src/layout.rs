use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DomainError;

/// Diseño de tablas que respalda a las órdenes.
///
/// - `Normalized`: `orders` + `order_accessories`, con flag `selected`.
/// - `Flat`: una fila de `orders` por accesorio, agrupadas por
///   `order_number`, con `celda` obligatoria.
///
/// Los dos diseños son incompatibles entre sí: una base de datos contiene
/// uno u otro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaLayout {
    Normalized,
    Flat,
}

impl SchemaLayout {
    pub fn requires_celda(&self) -> bool { matches!(self, SchemaLayout::Flat) }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaLayout::Normalized => "normalized",
            SchemaLayout::Flat => "flat",
        }
    }
}

impl Default for SchemaLayout {
    fn default() -> Self { SchemaLayout::Flat }
}

impl fmt::Display for SchemaLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for SchemaLayout {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normalized" | "normalizado" | "two-table" => Ok(SchemaLayout::Normalized),
            "flat" | "plano" | "denormalized" => Ok(SchemaLayout::Flat),
            other => Err(DomainError::UnknownLayout(other.to_string())),
        }
    }
}
