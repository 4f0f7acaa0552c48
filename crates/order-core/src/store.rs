use chrono::{DateTime, Utc};
use order_domain::{CloseOrder, NewOrder, Order, OrderFilter, SchemaLayout};

use crate::StoreError;

/// Puerto de persistencia de órdenes.
///
/// Contrato común a todos los backends:
/// - `list` devuelve órdenes ya agrupadas, más recientes primero; una orden
///   que coincide con el filtro se devuelve completa (todos sus accesorios).
/// - `insert` persiste la orden y sus accesorios con la fecha recibida.
/// - `close` marca la orden como cerrada; `StoreError::NotFound` si no hay
///   filas con ese id.
/// - `probe` es una única consulta de sólo lectura.
pub trait OrderStore {
    fn layout(&self) -> SchemaLayout;
    fn backend_name(&self) -> &'static str;
    fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, StoreError>;
    fn find(&self, id: i64) -> Result<Option<Order>, StoreError>;
    fn exists(&self, order_number: &str) -> Result<bool, StoreError>;
    fn insert(&mut self, order: &NewOrder, order_date: DateTime<Utc>) -> Result<Order, StoreError>;
    fn close(&mut self, request: &CloseOrder) -> Result<Order, StoreError>;
    fn probe(&self) -> Result<(), StoreError>;
}

impl<S: OrderStore + ?Sized> OrderStore for Box<S> {
    fn layout(&self) -> SchemaLayout { (**self).layout() }
    fn backend_name(&self) -> &'static str { (**self).backend_name() }
    fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, StoreError> { (**self).list(filter) }
    fn find(&self, id: i64) -> Result<Option<Order>, StoreError> { (**self).find(id) }
    fn exists(&self, order_number: &str) -> Result<bool, StoreError> { (**self).exists(order_number) }
    fn insert(&mut self, order: &NewOrder, order_date: DateTime<Utc>) -> Result<Order, StoreError> {
        (**self).insert(order, order_date)
    }
    fn close(&mut self, request: &CloseOrder) -> Result<Order, StoreError> { (**self).close(request) }
    fn probe(&self) -> Result<(), StoreError> { (**self).probe() }
}
