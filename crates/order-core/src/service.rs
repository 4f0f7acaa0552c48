//! Servicio de órdenes: valida, delega en el `OrderStore` y reenvuelve los
//! errores del backend con el prefijo de la operación que falló.
//!
//! No hay reintentos: un fallo del backend se devuelve tal cual al llamador.

use log::{debug, info, warn};
use order_domain::{confirm_close, Order, OrderDraft, OrderFilter, SchemaLayout};

use crate::{Clock, OrderStore, ServiceError, StoreError, SystemClock};

pub struct OrderService<S: OrderStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
}

impl<S: OrderStore> OrderService<S, SystemClock> {
    pub fn new(store: S) -> Self { Self { store, clock: SystemClock } }
}

impl<S: OrderStore, C: Clock> OrderService<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self { Self { store, clock } }

    pub fn layout(&self) -> SchemaLayout { self.store.layout() }

    pub fn store(&self) -> &S { &self.store }

    pub fn store_mut(&mut self) -> &mut S { &mut self.store }

    pub fn into_store(self) -> S { self.store }

    /// Todas las órdenes, más recientes primero.
    pub fn list_all(&self) -> Result<Vec<Order>, ServiceError> {
        self.store.list(&OrderFilter::all()).map_err(ServiceError::Database)
    }

    /// Sin criterios equivale a `list_all`.
    pub fn search(&self, filter: &OrderFilter) -> Result<Vec<Order>, ServiceError> {
        if filter.is_empty() {
            return self.list_all();
        }
        debug!("search term={:?} date={:?}", filter.search_term(), filter.date);
        self.store.list(filter).map_err(ServiceError::Search)
    }

    /// Valida el borrador, comprueba que el número no exista e inserta con la
    /// fecha del reloj. La validación no toca el backend.
    pub fn create(&mut self, draft: &OrderDraft) -> Result<Order, ServiceError> {
        let new_order = draft.validate(self.layout())?;
        if self.store.exists(new_order.order_number()).map_err(ServiceError::Get)? {
            warn!("order_number {} already exists", new_order.order_number());
            return Err(ServiceError::DuplicateOrderNumber(new_order.order_number().to_string()));
        }
        let created = self.store
                          .insert(&new_order, self.clock.now())
                          .map_err(|e| match e {
                              StoreError::Duplicate(_) => {
                                  ServiceError::DuplicateOrderNumber(new_order.order_number().to_string())
                              }
                              other => ServiceError::Insert(other),
                          })?;
        info!("order {} created id={} accessories={}",
              created.order_number,
              created.id,
              created.accessories.len());
        Ok(created)
    }

    /// Cierra la orden `id` si `confirmation` coincide exactamente con su
    /// número. El cierre es definitivo.
    pub fn close(&mut self, id: i64, confirmation: &str, accessories_added: bool) -> Result<Order, ServiceError> {
        let order = self.store
                        .find(id)
                        .map_err(ServiceError::Get)?
                        .ok_or(ServiceError::NotFound(id))?;
        let request = confirm_close(&order, confirmation, accessories_added)?;
        let closed = self.store.close(&request).map_err(|e| match e {
                                                   StoreError::NotFound => ServiceError::NotFound(id),
                                                   other => ServiceError::Update(other),
                                               })?;
        info!("order {} closed accessories_added={}", closed.order_number, accessories_added);
        Ok(closed)
    }

    pub fn probe(&self) -> Result<(), StoreError> { self.store.probe() }
}
