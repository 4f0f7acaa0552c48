//! order-domain
//!
//! Tipos del dominio de órdenes de accesorios: líneas de accesorio, celdas,
//! órdenes, borradores de formulario y las reglas puras que los rodean
//! (validación, agrupación de filas planas, confirmación de cierre y
//! filtros de búsqueda). No conoce la base de datos ni la red.

pub mod accessory;
pub mod celda;
pub mod closing;
pub mod draft;
pub mod error;
pub mod filter;
pub mod grouping;
pub mod layout;
pub mod order;

pub use accessory::{AccessoryLine, AccessoryType};
pub use celda::{Celda, Placement};
pub use closing::{confirm_close, CloseOrder};
pub use draft::OrderDraft;
pub use error::DomainError;
pub use filter::OrderFilter;
pub use grouping::{group_rows, FlatOrderRow, NewFlatRow};
pub use layout::SchemaLayout;
pub use order::{NewOrder, Order, OrderStatus};
