use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccessoryLine, Celda, Placement};

/// Orden de accesorios tal como la ve el resto del sistema (ya agrupada).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub accessories: Vec<AccessoryLine>,
    pub extra_accessory: bool,
    pub placement: Placement,
    pub order_date: DateTime<Utc>,
    pub is_closed: bool,
    pub accessories_added: bool,
}

/// Estado derivado de los flags `is_closed` / `accessories_added`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Open,
    Closed { accessories_added: bool },
}

impl OrderStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Open => "Abierta",
            OrderStatus::Closed { accessories_added: true } => "Agregados",
            OrderStatus::Closed { accessories_added: false } => "No Agregados",
        }
    }
}

impl Order {
    pub fn status(&self) -> OrderStatus {
        if self.is_closed {
            OrderStatus::Closed { accessories_added: self.accessories_added }
        } else {
            OrderStatus::Open
        }
    }

    pub fn celda(&self) -> Option<Celda> { self.placement.celda() }

    /// Suma en `u64`: varias líneas cerca del tope no desbordan.
    pub fn total_quantity(&self) -> u64 { self.accessories.iter().map(|a| u64::from(a.quantity)).sum() }

    /// `"bolsa x2, gorra x1"`.
    pub fn accessories_summary(&self) -> String {
        self.accessories.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    }

    /// Transición única abierta → cerrada.
    pub fn closed(mut self, accessories_added: bool) -> Self {
        self.is_closed = true;
        self.accessories_added = accessories_added;
        self
    }
}

/// Orden validada, lista para insertar. Sólo se construye a través de
/// `OrderDraft::validate`, de modo que un `NewOrder` siempre tiene número,
/// al menos un accesorio con cantidad positiva y una ubicación coherente con
/// el esquema.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    order_number: String,
    accessories: Vec<AccessoryLine>,
    extra_accessory: bool,
    placement: Placement,
}

impl NewOrder {
    pub(crate) fn new(order_number: String, accessories: Vec<AccessoryLine>, extra_accessory: bool, placement: Placement) -> Self {
        Self { order_number,
               accessories,
               extra_accessory,
               placement }
    }

    pub fn order_number(&self) -> &str { &self.order_number }
    pub fn accessories(&self) -> &[AccessoryLine] { &self.accessories }
    pub fn extra_accessory(&self) -> bool { self.extra_accessory }
    pub fn placement(&self) -> Placement { self.placement }

    /// Materializa la orden con el id asignado por la base y la fecha del
    /// cliente. Las órdenes nuevas siempre nacen abiertas.
    pub fn into_order(self, id: i64, order_date: DateTime<Utc>) -> Order {
        Order { id,
                order_number: self.order_number,
                accessories: self.accessories,
                extra_accessory: self.extra_accessory,
                placement: self.placement,
                order_date,
                is_closed: false,
                accessories_added: false }
    }
}
