
use order_core::{FixedClock, OrderService, OrderStore, ServiceError};
use order_domain::{AccessoryLine, AccessoryType, DomainError, OrderDraft, OrderFilter, SchemaLayout};
use order_persistence::{PgFlatOrderStore, PoolProvider};
use test_support::{unique_number, with_pool};

fn draft(number: &str) -> OrderDraft {
    OrderDraft::new(number).with_extra_accessory(true)
                           .with_celda("Celda 16")
                           .with_accessory(AccessoryLine::new(AccessoryType::Bolsa, 2))
                           .with_accessory(AccessoryLine::new(AccessoryType::Gorra, 1))
                           .with_accessory(AccessoryLine::new(AccessoryType::AccesorioPequeno, 4))
}

#[test]
fn flat_insert_groups_search_and_close() {
    with_pool(SchemaLayout::Flat, |pool| {
        let store = PgFlatOrderStore::new(PoolProvider { pool: pool.clone() });
        let clock = FixedClock(chrono::Utc::now());
        let mut service = OrderService::with_clock(store, clock);
        let number = unique_number("FLAT");

        let created = service.create(&draft(&number)).expect("create");
        assert_eq!(created.accessories.len(), 3);
        assert_eq!(created.celda().map(|c| c.as_str()), Some("Celda 16"));

        let dup = service.create(&draft(&number)).unwrap_err();
        assert_eq!(dup, ServiceError::DuplicateOrderNumber(number.clone()));

        let found = service.search(&OrderFilter::all().with_search(&number)).expect("search");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].accessories.len(), 3);

        // Coincide una sola fila (la del accesorio pequeño) y vuelve la orden entera.
        let by_accessory = OrderFilter::all().with_search("pequeño")
                                             .with_date(created.order_date.date_naive());
        let found = service.search(&by_accessory).expect("search by accessory");
        let ours = found.iter().find(|o| o.id == created.id).expect("found by accessory");
        assert_eq!(ours.accessories.len(), 3);
        assert_eq!(ours.total_quantity(), 7);

        let mismatch = service.close(created.id, "otra", true).unwrap_err();
        assert!(matches!(mismatch, ServiceError::Validation(DomainError::ConfirmationMismatch { .. })));

        let closed = service.close(created.id, &number, true).expect("close");
        assert!(closed.is_closed && closed.accessories_added);
        let reloaded = service.store().find(created.id).expect("find").expect("exists");
        assert!(reloaded.is_closed);
        assert_eq!(reloaded.accessories.len(), 3);
    });
}

#[test]
fn flat_probe_and_missing_id() {
    with_pool(SchemaLayout::Flat, |pool| {
        let store = PgFlatOrderStore::new(PoolProvider { pool: pool.clone() });
        store.probe().expect("probe");
        assert_eq!(store.find(i64::MAX).expect("find"), None);
    });
}
