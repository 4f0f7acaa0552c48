use accessory_orders::demo::{demo_drafts, seed_demo_orders};
use accessory_orders::order_core::{BannerKind, FixedClock};
use accessory_orders::order_export::{render, ExportFormat, ExportTable};
use accessory_orders::{InMemoryOrderStore, OrderFilter, OrderForm, OrderService, SchemaLayout};
use chrono::{TimeZone, Utc};

fn service(layout: SchemaLayout) -> OrderService<InMemoryOrderStore, FixedClock> {
    OrderService::with_clock(InMemoryOrderStore::new(layout),
                             FixedClock(Utc.with_ymd_and_hms(2024, 8, 20, 14, 0, 0).unwrap()))
}

#[test]
fn export_rows_match_displayed_orders() {
    for layout in [SchemaLayout::Flat, SchemaLayout::Normalized] {
        let mut svc = service(layout);
        seed_demo_orders(&mut svc).unwrap();
        let mut form = OrderForm::new();
        form.apply_filter(&svc, OrderFilter::all().with_search("ORD-100"));
        assert_eq!(form.orders().len(), demo_drafts().len());

        form.apply_filter(&svc, OrderFilter::all().with_search("pelota"));
        let table = ExportTable::from_orders(form.orders(), svc.layout());
        assert_eq!(table.len(), form.orders().len());
        assert_eq!(table.len(), 1);
        assert_eq!(&render(&table, ExportFormat::Xlsx).unwrap()[..2], b"PK");
    }
}

#[test]
fn multi_accessory_order_groups_and_closes() {
    let mut svc = service(SchemaLayout::Flat);
    seed_demo_orders(&mut svc).unwrap();
    let mut form = OrderForm::new();
    form.refresh(&svc);
    let order = form.orders().iter().find(|o| o.order_number == "ORD-1003").cloned().unwrap();
    assert_eq!(order.accessories.len(), 3);
    assert_eq!(order.total_quantity(), 8);

    form.set_confirmation(order.id, "ORD-1002");
    assert!(!form.close(&mut svc, order.id, true));
    assert_eq!(form.banner().unwrap().kind, BannerKind::Rejected);

    form.set_confirmation(order.id, "ORD-1003");
    assert!(form.close(&mut svc, order.id, true));
    let closed = form.orders().iter().find(|o| o.id == order.id).unwrap();
    assert_eq!(closed.status().label(), "Agregados");
}

#[test]
fn date_filter_covers_whole_day() {
    let mut svc = service(SchemaLayout::Flat);
    seed_demo_orders(&mut svc).unwrap();
    let same_day = OrderFilter::all().with_date(OrderFilter::parse_date("2024-08-20").unwrap());
    assert_eq!(svc.search(&same_day).unwrap().len(), 3);
    let next_day = OrderFilter::all().with_date(OrderFilter::parse_date("2024-08-21").unwrap());
    assert!(svc.search(&next_day).unwrap().is_empty());
}
