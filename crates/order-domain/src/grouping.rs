//! Esquema plano: una fila por accesorio que comparte `order_number`.
//!
//! `group_rows` reconstruye las órdenes anidadas a partir de esas filas. Es
//! una transformación pura: la primera fila de cada número aporta id, flags
//! y fecha; cada fila aporta exactamente un accesorio; el orden de salida
//! sigue la primera aparición de cada número (la consulta ya viene ordenada
//! por fecha descendente).

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{AccessoryLine, AccessoryType, Celda, DomainError, NewOrder, Order, Placement};

/// Fila leída de la tabla plana `orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatOrderRow {
    pub id: i64,
    pub order_number: String,
    pub accessory_type: String,
    pub quantity: i32,
    pub extra_accessory: bool,
    pub celda: String,
    pub order_date: DateTime<Utc>,
    pub is_closed: bool,
    pub accessories_added: bool,
}

/// Fila a insertar en la tabla plana (sin id: lo asigna la base).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFlatRow {
    pub order_number: String,
    pub accessory_type: String,
    pub quantity: i32,
    pub extra_accessory: bool,
    pub celda: String,
    pub order_date: DateTime<Utc>,
    pub is_closed: bool,
    pub accessories_added: bool,
}

impl NewFlatRow {
    /// Una fila por accesorio, todas con la misma fecha y flags iniciales.
    pub fn rows_for(order: &NewOrder, order_date: DateTime<Utc>) -> Result<Vec<NewFlatRow>, DomainError> {
        let celda = order.placement().celda().ok_or(DomainError::MissingCelda)?;
        order.accessories()
             .iter()
             .map(|line| {
                 let quantity = i32::try_from(line.quantity).map_err(|_| DomainError::InvalidQuantity {
                     accessory: line.accessory_type.to_string(),
                     quantity: i64::from(line.quantity),
                 })?;
                 Ok(NewFlatRow { order_number: order.order_number().to_string(),
                                 accessory_type: line.accessory_type.as_str().to_string(),
                                 quantity,
                                 extra_accessory: order.extra_accessory(),
                                 celda: celda.as_str().to_string(),
                                 order_date,
                                 is_closed: false,
                                 accessories_added: false })
             })
             .collect()
    }
}

fn line_from_row(row: &FlatOrderRow) -> Result<AccessoryLine, DomainError> {
    let accessory_type: AccessoryType = row.accessory_type.parse()?;
    let quantity = u32::try_from(row.quantity).map_err(|_| DomainError::InvalidQuantity {
        accessory: row.accessory_type.clone(),
        quantity: i64::from(row.quantity),
    })?;
    Ok(AccessoryLine::new(accessory_type, quantity))
}

pub fn group_rows<I>(rows: I) -> Result<Vec<Order>, DomainError>
    where I: IntoIterator<Item = FlatOrderRow>
{
    let mut grouped: IndexMap<String, Order> = IndexMap::new();
    for row in rows {
        let line = line_from_row(&row)?;
        if let Some(order) = grouped.get_mut(&row.order_number) {
            order.accessories.push(line);
            continue;
        }
        let celda: Celda = row.celda.parse()?;
        grouped.insert(row.order_number.clone(),
                       Order { id: row.id,
                               order_number: row.order_number,
                               accessories: vec![line],
                               extra_accessory: row.extra_accessory,
                               placement: Placement::Celda(celda),
                               order_date: row.order_date,
                               is_closed: row.is_closed,
                               accessories_added: row.accessories_added });
    }
    Ok(grouped.into_values().collect())
}
