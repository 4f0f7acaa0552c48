use std::cell::Cell;

use chrono::{DateTime, Utc};
use log::debug;
use order_domain::{CloseOrder, NewOrder, Order, OrderFilter, SchemaLayout};

use crate::{OrderStore, StoreError};

/// Backend en memoria con paridad de comportamiento respecto a los backends
/// Postgres:
/// - `Normalized` rechaza números de orden repetidos (UNIQUE en la tabla).
/// - `Flat` no tiene esa restricción: un número repetido suma sus
///   accesorios a la orden existente, igual que al agrupar filas planas.
///
/// Cuenta las llamadas recibidas (`calls`) para poder verificar que una
/// validación fallida no toca el backend.
pub struct InMemoryOrderStore {
    layout: SchemaLayout,
    orders: Vec<Order>,
    next_id: i64,
    calls: Cell<usize>,
    failure: Option<String>,
    /// Con `Some(op)` la falla sólo aplica a esa operación.
    failing_op: Option<&'static str>,
}

impl InMemoryOrderStore {
    pub fn new(layout: SchemaLayout) -> Self {
        Self { layout,
               orders: Vec::new(),
               next_id: 1,
               calls: Cell::new(0),
               failure: None,
               failing_op: None }
    }

    /// Backend que falla en cada operación con el mensaje dado.
    pub fn failing(layout: SchemaLayout, message: impl Into<String>) -> Self {
        Self { failure: Some(message.into()),
               ..Self::new(layout) }
    }

    /// Backend que falla sólo en `op` (`list`, `insert`, `close`...).
    pub fn failing_on(layout: SchemaLayout, op: &'static str, message: impl Into<String>) -> Self {
        Self { failure: Some(message.into()),
               failing_op: Some(op),
               ..Self::new(layout) }
    }

    pub fn calls(&self) -> usize { self.calls.get() }

    pub fn len(&self) -> usize { self.orders.len() }

    pub fn is_empty(&self) -> bool { self.orders.is_empty() }

    fn enter(&self, op: &str) -> Result<(), StoreError> {
        self.calls.set(self.calls.get() + 1);
        debug!("memory:{op} layout={}", self.layout);
        match (&self.failure, self.failing_op) {
            (Some(message), None) => Err(StoreError::Backend(message.clone())),
            (Some(message), Some(target)) if target == op => Err(StoreError::Backend(message.clone())),
            _ => Ok(()),
        }
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self { Self::new(SchemaLayout::default()) }
}

impl OrderStore for InMemoryOrderStore {
    fn layout(&self) -> SchemaLayout { self.layout }

    fn backend_name(&self) -> &'static str { "memory" }

    fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, StoreError> {
        self.enter("list")?;
        let mut found: Vec<Order> = self.orders.iter().filter(|o| filter.matches(o)).cloned().collect();
        found.sort_by(|a, b| b.order_date.cmp(&a.order_date).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    fn find(&self, id: i64) -> Result<Option<Order>, StoreError> {
        self.enter("find")?;
        Ok(self.orders.iter().find(|o| o.id == id).cloned())
    }

    fn exists(&self, order_number: &str) -> Result<bool, StoreError> {
        self.enter("exists")?;
        Ok(self.orders.iter().any(|o| o.order_number == order_number))
    }

    fn insert(&mut self, order: &NewOrder, order_date: DateTime<Utc>) -> Result<Order, StoreError> {
        self.enter("insert")?;
        if let Some(existing) = self.orders.iter_mut().find(|o| o.order_number == order.order_number()) {
            return match self.layout {
                SchemaLayout::Normalized => {
                    Err(StoreError::Duplicate(format!("duplicate key value violates unique constraint: {}",
                                                      order.order_number())))
                }
                SchemaLayout::Flat => {
                    existing.accessories.extend(order.accessories().iter().cloned());
                    Ok(existing.clone())
                }
            };
        }
        let id = self.next_id;
        self.next_id += 1;
        let created = order.clone().into_order(id, order_date);
        self.orders.push(created.clone());
        Ok(created)
    }

    fn close(&mut self, request: &CloseOrder) -> Result<Order, StoreError> {
        self.enter("close")?;
        let order = self.orders
                        .iter_mut()
                        .find(|o| o.id == request.id())
                        .ok_or(StoreError::NotFound)?;
        order.is_closed = true;
        order.accessories_added = request.accessories_added();
        Ok(order.clone())
    }

    fn probe(&self) -> Result<(), StoreError> { self.enter("probe") }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use order_domain::{AccessoryLine, AccessoryType, OrderDraft};

    fn new_order(number: &str, layout: SchemaLayout) -> NewOrder {
        OrderDraft::new(number).with_extra_accessory(true)
                               .with_celda("Celda 15")
                               .with_accessory(AccessoryLine::new(AccessoryType::Pelota, 3))
                               .validate(layout)
                               .unwrap()
    }

    #[test]
    fn normalized_layout_rejects_duplicates() {
        let mut store = InMemoryOrderStore::new(SchemaLayout::Normalized);
        let when = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        store.insert(&new_order("N-1", SchemaLayout::Normalized), when).unwrap();
        let err = store.insert(&new_order("N-1", SchemaLayout::Normalized), when).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn flat_layout_merges_repeated_numbers() {
        let mut store = InMemoryOrderStore::new(SchemaLayout::Flat);
        let when = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        store.insert(&new_order("F-1", SchemaLayout::Flat), when).unwrap();
        let merged = store.insert(&new_order("F-1", SchemaLayout::Flat), when).unwrap();
        assert_eq!(merged.accessories.len(), 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn list_is_newest_first() {
        let mut store = InMemoryOrderStore::new(SchemaLayout::Flat);
        store.insert(&new_order("OLD", SchemaLayout::Flat), Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()).unwrap();
        store.insert(&new_order("NEW", SchemaLayout::Flat), Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()).unwrap();
        let listed = store.list(&OrderFilter::all()).unwrap();
        let numbers: Vec<&str> = listed.iter().map(|o| o.order_number.as_str()).collect();
        assert_eq!(numbers, vec!["NEW", "OLD"]);
    }

    #[test]
    fn same_date_lists_lower_id_first() {
        let mut store = InMemoryOrderStore::new(SchemaLayout::Flat);
        let when = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        for number in ["T-1", "T-2", "T-3"] {
            store.insert(&new_order(number, SchemaLayout::Flat), when).unwrap();
        }
        let ids: Vec<i64> = store.list(&OrderFilter::all()).unwrap().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn failure_can_target_one_operation() {
        let mut store = InMemoryOrderStore::failing_on(SchemaLayout::Flat, "list", "timeout");
        let when = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(store.insert(&new_order("L-1", SchemaLayout::Flat), when).is_ok());
        assert_eq!(store.list(&OrderFilter::all()), Err(StoreError::Backend("timeout".into())));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn failing_store_counts_calls_and_errors() {
        let store = InMemoryOrderStore::failing(SchemaLayout::Flat, "connection refused");
        assert_eq!(store.probe(), Err(StoreError::Backend("connection refused".into())));
        assert_eq!(store.calls(), 1);
    }
}
