
use chrono::Utc;
use order_core::{FixedClock, OrderService, OrderStore, ServiceError};
use order_domain::{AccessoryLine, AccessoryType, OrderDraft, OrderFilter, SchemaLayout};
use order_persistence::{PgNormalizedOrderStore, PoolProvider};
use test_support::{unique_number, with_pool};

#[test]
fn normalized_roundtrip_with_accessories() {
    with_pool(SchemaLayout::Normalized, |pool| {
        let store = PgNormalizedOrderStore::new(PoolProvider { pool: pool.clone() });
        let mut service = OrderService::with_clock(store, FixedClock(Utc::now()));
        let number = unique_number("NORM");
        let draft = OrderDraft::new(&number).with_extra_accessory(true)
                                            .with_selected(true)
                                            .with_accessory(AccessoryLine::new(AccessoryType::Kit, 1))
                                            .with_accessory(AccessoryLine::new(AccessoryType::Guantes, 2));

        let created = service.create(&draft).expect("create");
        assert_eq!(created.accessories.len(), 2);
        assert!(created.placement.is_marked());

        assert_eq!(service.create(&draft).unwrap_err(), ServiceError::DuplicateOrderNumber(number.clone()));

        let by_type = service.search(&OrderFilter::all().with_search("guantes")).expect("search");
        let ours = by_type.iter().find(|o| o.id == created.id).expect("found by accessory");
        assert_eq!(ours.accessories.len(), 2);

        let closed = service.close(created.id, &number, false).expect("close");
        assert!(closed.is_closed);
        assert!(!closed.accessories_added);
        assert_eq!(service.close(i64::MAX, "x", true).unwrap_err(), ServiceError::NotFound(i64::MAX));
    });
}

#[test]
fn normalized_probe() {
    with_pool(SchemaLayout::Normalized, |pool| {
        let store = PgNormalizedOrderStore::new(PoolProvider { pool: pool.clone() });
        store.probe().expect("probe");
    });
}
