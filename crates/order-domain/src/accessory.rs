use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DomainError;

/// Tipos de accesorio ofrecidos por el formulario. El string serializado es
/// el mismo que se guarda en la columna `accessory_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessoryType {
    #[serde(rename = "bolsa")]
    Bolsa,
    #[serde(rename = "pelota")]
    Pelota,
    #[serde(rename = "gorra")]
    Gorra,
    #[serde(rename = "guantes")]
    Guantes,
    #[serde(rename = "kit")]
    Kit,
    #[serde(rename = "accesorio pequeño")]
    AccesorioPequeno,
}

impl AccessoryType {
    pub const ALL: [AccessoryType; 6] = [AccessoryType::Bolsa,
                                         AccessoryType::Pelota,
                                         AccessoryType::Gorra,
                                         AccessoryType::Guantes,
                                         AccessoryType::Kit,
                                         AccessoryType::AccesorioPequeno];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessoryType::Bolsa => "bolsa",
            AccessoryType::Pelota => "pelota",
            AccessoryType::Gorra => "gorra",
            AccessoryType::Guantes => "guantes",
            AccessoryType::Kit => "kit",
            AccessoryType::AccesorioPequeno => "accesorio pequeño",
        }
    }
}

impl Default for AccessoryType {
    fn default() -> Self { AccessoryType::Bolsa }
}

impl fmt::Display for AccessoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for AccessoryType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', " ");
        match normalized.as_str() {
            "bolsa" => Ok(AccessoryType::Bolsa),
            "pelota" => Ok(AccessoryType::Pelota),
            "gorra" => Ok(AccessoryType::Gorra),
            "guantes" => Ok(AccessoryType::Guantes),
            "kit" => Ok(AccessoryType::Kit),
            "accesorio pequeño" | "accesorio pequeno" => Ok(AccessoryType::AccesorioPequeno),
            _ => Err(DomainError::UnknownAccessory(s.trim().to_string())),
        }
    }
}

/// Una línea `(tipo, cantidad)` dentro de una orden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryLine {
    pub accessory_type: AccessoryType,
    pub quantity: u32,
}

/// Tope de cantidad por línea: las columnas `quantity` son `INTEGER`.
pub const MAX_QUANTITY: u32 = i32::MAX as u32;

impl AccessoryLine {
    pub fn new(accessory_type: AccessoryType, quantity: u32) -> Self { Self { accessory_type, quantity } }

    /// La cantidad debe estar entre 1 y `MAX_QUANTITY`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.quantity == 0 || self.quantity > MAX_QUANTITY {
            return Err(DomainError::InvalidQuantity { accessory: self.accessory_type.to_string(),
                                                      quantity: i64::from(self.quantity) });
        }
        Ok(())
    }
}

impl Default for AccessoryLine {
    fn default() -> Self { Self::new(AccessoryType::Bolsa, 1) }
}

impl fmt::Display for AccessoryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{} x{}", self.accessory_type, self.quantity) }
}

/// Acepta `tipo` (cantidad 1) o `tipo:cantidad`, p. ej. `gorra:3`.
impl FromStr for AccessoryLine {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, quantity) = match s.rsplit_once(':') {
            Some((kind, qty)) => {
                let parsed: i64 = qty.trim()
                                     .parse()
                                     .map_err(|_| DomainError::UnparsableQuantity { accessory: kind.trim().to_string(),
                                                                                    raw: qty.trim().to_string() })?;
                (kind, parsed)
            }
            None => (s, 1),
        };
        let accessory_type: AccessoryType = kind.parse()?;
        let quantity = u32::try_from(quantity).map_err(|_| DomainError::InvalidQuantity { accessory: accessory_type.to_string(),
                                                                                         quantity })?;
        let line = AccessoryLine::new(accessory_type, quantity);
        line.validate()?;
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names_and_variants() {
        assert_eq!("Gorra".parse::<AccessoryType>().unwrap(), AccessoryType::Gorra);
        assert_eq!("accesorio_pequeno".parse::<AccessoryType>().unwrap(), AccessoryType::AccesorioPequeno);
        assert!("sombrero".parse::<AccessoryType>().is_err());
    }

    #[test]
    fn parses_line_specs() {
        let line: AccessoryLine = "kit:4".parse().unwrap();
        assert_eq!(line, AccessoryLine::new(AccessoryType::Kit, 4));
        let single: AccessoryLine = "accesorio pequeño".parse().unwrap();
        assert_eq!(single.quantity, 1);
        assert!(matches!("bolsa:0".parse::<AccessoryLine>(), Err(DomainError::InvalidQuantity { .. })));
        assert!(matches!("bolsa:-2".parse::<AccessoryLine>(), Err(DomainError::InvalidQuantity { quantity: -2, .. })));
    }

    #[test]
    fn non_numeric_quantity_keeps_raw_text() {
        let err = "bolsa:abc".parse::<AccessoryLine>().unwrap_err();
        assert_eq!(err, DomainError::UnparsableQuantity { accessory: "bolsa".into(), raw: "abc".into() });
        assert_eq!(err.to_string(), "Cantidad inválida para bolsa: abc");
    }

    #[test]
    fn quantity_must_fit_integer_column() {
        assert!(AccessoryLine::new(AccessoryType::Bolsa, MAX_QUANTITY).validate().is_ok());
        let err = AccessoryLine::new(AccessoryType::Bolsa, 3_000_000_000).validate().unwrap_err();
        assert_eq!(err,
                   DomainError::InvalidQuantity { accessory: "bolsa".into(),
                                                  quantity: 3_000_000_000 });
        assert!("gorra:3000000000".parse::<AccessoryLine>().is_err());
    }

    #[test]
    fn serializes_with_spanish_wire_names() {
        let json = serde_json::to_string(&AccessoryType::AccesorioPequeno).unwrap();
        assert_eq!(json, "\"accesorio pequeño\"");
    }
}
