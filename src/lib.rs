//! Accessory Orders
//!
//! Fachada del workspace:
//! - `order_domain`: tipos y validación (sin E/S).
//! - `order_core`: `OrderStore`, `OrderService`, formulario y diagnóstico.
//! - `order_persistence`: backends Postgres (dos esquemas) y REST.
//! - `order_export`: reportes Excel / PDF.
//!
//! `demo` carga un conjunto pequeño de órdenes de ejemplo.

pub mod demo;

pub use order_core;
pub use order_domain;
pub use order_export;
pub use order_persistence;

pub use order_core::{InMemoryOrderStore, OrderForm, OrderService, OrderStore, ServiceError};
pub use order_domain::{AccessoryLine, AccessoryType, Celda, Order, OrderDraft, OrderFilter, SchemaLayout};
