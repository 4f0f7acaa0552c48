use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DomainError;

/// Ubicación fija asignada a una orden en el esquema plano.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Celda {
    #[serde(rename = "Celda 10")]
    C10,
    #[serde(rename = "Celda 11")]
    C11,
    #[serde(rename = "Celda 15")]
    C15,
    #[serde(rename = "Celda 16")]
    C16,
}

impl Celda {
    pub const ALL: [Celda; 4] = [Celda::C10, Celda::C11, Celda::C15, Celda::C16];

    pub fn as_str(&self) -> &'static str {
        match self {
            Celda::C10 => "Celda 10",
            Celda::C11 => "Celda 11",
            Celda::C15 => "Celda 15",
            Celda::C16 => "Celda 16",
        }
    }

    /// `"Celda 10, Celda 11, Celda 15, Celda 16"`.
    pub fn options_label() -> String { Self::ALL.iter().map(Celda::as_str).collect::<Vec<_>>().join(", ") }
}

impl fmt::Display for Celda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Acepta la etiqueta completa (sin distinguir mayúsculas) o sólo el número.
impl FromStr for Celda {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lowered = trimmed.to_lowercase();
        let number = lowered.strip_prefix("celda").map(str::trim).unwrap_or(lowered.as_str());
        match number {
            "10" => Ok(Celda::C10),
            "11" => Ok(Celda::C11),
            "15" => Ok(Celda::C15),
            "16" => Ok(Celda::C16),
            _ => Err(DomainError::InvalidCelda(trimmed.to_string())),
        }
    }
}

/// Campo de selección única de la orden. El esquema normalizado guarda el
/// flag `selected`; el plano guarda una `Celda`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Selected(bool),
    Celda(Celda),
}

impl Placement {
    pub fn celda(&self) -> Option<Celda> {
        match self {
            Placement::Celda(c) => Some(*c),
            Placement::Selected(_) => None,
        }
    }

    /// Valor para la columna booleana `selected`; una celda cuenta como marcada.
    pub fn is_marked(&self) -> bool {
        match self {
            Placement::Selected(flag) => *flag,
            Placement::Celda(_) => true,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Placement::Selected(true) => "Sí".to_string(),
            Placement::Selected(false) => "No".to_string(),
            Placement::Celda(c) => c.to_string(),
        }
    }
}
