//! Órdenes de ejemplo para la demo y los tests de punta a punta.

use log::info;
use order_core::{Clock, OrderService, OrderStore, ServiceError};
use order_domain::{AccessoryLine, AccessoryType, Celda, Order, OrderDraft};

/// Borradores de ejemplo; `celda` y `selected` van ambos cargados para que
/// sirvan en cualquier esquema.
pub fn demo_drafts() -> Vec<OrderDraft> {
    vec![OrderDraft::new("ORD-1001").with_extra_accessory(true)
                                    .with_celda(Celda::C10.as_str())
                                    .with_selected(true)
                                    .with_accessory(AccessoryLine::new(AccessoryType::Bolsa, 2))
                                    .with_accessory(AccessoryLine::new(AccessoryType::Gorra, 1)),
         OrderDraft::new("ORD-1002").with_extra_accessory(true)
                                    .with_celda(Celda::C15.as_str())
                                    .with_accessory(AccessoryLine::new(AccessoryType::Pelota, 3)),
         OrderDraft::new("ORD-1003").with_extra_accessory(true)
                                    .with_celda(Celda::C16.as_str())
                                    .with_accessory(AccessoryLine::new(AccessoryType::Kit, 1))
                                    .with_accessory(AccessoryLine::new(AccessoryType::Guantes, 2))
                                    .with_accessory(AccessoryLine::new(AccessoryType::AccesorioPequeno, 5)),]
}

/// Inserta los borradores de ejemplo; los números ya existentes se saltan.
pub fn seed_demo_orders<S: OrderStore, C: Clock>(service: &mut OrderService<S, C>) -> Result<Vec<Order>, ServiceError> {
    let mut created = Vec::new();
    for draft in demo_drafts() {
        match service.create(&draft) {
            Ok(order) => created.push(order),
            Err(ServiceError::DuplicateOrderNumber(number)) => info!("demo: {number} ya existe"),
            Err(e) => return Err(e),
        }
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use order_core::InMemoryOrderStore;
    use order_domain::SchemaLayout;

    #[test]
    fn seeding_twice_is_idempotent() {
        let mut service = OrderService::new(InMemoryOrderStore::new(SchemaLayout::Normalized));
        assert_eq!(seed_demo_orders(&mut service).unwrap().len(), 3);
        assert!(seed_demo_orders(&mut service).unwrap().is_empty());
        assert_eq!(service.list_all().unwrap().len(), 3);
    }
}
