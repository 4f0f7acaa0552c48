//! Cierre de órdenes: el usuario debe volver a escribir el número de orden.

use crate::{DomainError, Order};

/// Cierre ya confirmado. Sólo se obtiene vía `confirm_close`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseOrder {
    id: i64,
    order_number: String,
    accessories_added: bool,
}

impl CloseOrder {
    pub fn id(&self) -> i64 { self.id }
    pub fn order_number(&self) -> &str { &self.order_number }
    pub fn accessories_added(&self) -> bool { self.accessories_added }
}

/// La confirmación debe ser exactamente igual al `order_number` (sin
/// recortar espacios ni ignorar mayúsculas). Una orden cerrada no vuelve a
/// cerrarse.
pub fn confirm_close(order: &Order, confirmation: &str, accessories_added: bool) -> Result<CloseOrder, DomainError> {
    if order.is_closed {
        return Err(DomainError::AlreadyClosed(order.order_number.clone()));
    }
    if confirmation != order.order_number {
        return Err(DomainError::ConfirmationMismatch { expected: order.order_number.clone() });
    }
    Ok(CloseOrder { id: order.id,
                    order_number: order.order_number.clone(),
                    accessories_added })
}
