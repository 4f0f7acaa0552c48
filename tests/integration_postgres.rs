use accessory_orders::demo::seed_demo_orders;
use accessory_orders::order_persistence::config::DbConfig;
use accessory_orders::order_persistence::{build_pool, PgFlatOrderStore, PgNormalizedOrderStore, PoolProvider};
use accessory_orders::{OrderFilter, OrderService, OrderStore, SchemaLayout};

#[test]
fn seed_and_list_on_configured_layout() {
    let Ok(cfg) = DbConfig::from_env() else {
        eprintln!("skip (no DATABASE_URL)");
        return;
    };
    let pool = build_pool(&cfg.url, 1, 2, cfg.layout).expect("pool");
    let provider = PoolProvider { pool };
    let store: Box<dyn OrderStore> = match cfg.layout {
        SchemaLayout::Normalized => Box::new(PgNormalizedOrderStore::new(provider)),
        SchemaLayout::Flat => Box::new(PgFlatOrderStore::new(provider)),
    };
    let mut service = OrderService::new(store);
    seed_demo_orders(&mut service).expect("seed");
    let found = service.search(&OrderFilter::all().with_search("ORD-100")).expect("search");
    assert!(found.len() >= 3);
    let grouped = found.iter().find(|o| o.order_number == "ORD-1003").expect("ORD-1003");
    assert!(grouped.accessories.len() >= 3);
}
