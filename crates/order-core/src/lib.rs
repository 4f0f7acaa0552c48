//! order-core: capa de acceso a datos y estado del formulario.
//!
//! - `store`: puerto `OrderStore` que implementan los backends.
//! - `memory`: backend en memoria (tests, demo, `--backend memory`).
//! - `service`: `OrderService`, el shim que valida, consulta y reenvuelve
//!   errores con un prefijo legible.
//! - `form`: estado efímero del formulario y la tabla.
//! - `diagnostics`: sonda de conectividad + metadatos de entorno.
pub mod clock;
pub mod diagnostics;
pub mod errors;
pub mod form;
pub mod memory;
pub mod service;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use diagnostics::{Connectivity, DebugReport, EnvironmentInfo};
pub use errors::{ServiceError, StoreError};
pub use form::{Banner, BannerKind, OrderForm};
pub use memory::InMemoryOrderStore;
pub use service::OrderService;
pub use store::OrderStore;
