use chrono::{TimeZone, Utc};
use order_core::{BannerKind, FixedClock, InMemoryOrderStore, OrderForm, OrderService};
use order_domain::{AccessoryLine, AccessoryType, OrderFilter, SchemaLayout};

fn service() -> OrderService<InMemoryOrderStore, FixedClock> {
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap());
    OrderService::with_clock(InMemoryOrderStore::new(SchemaLayout::Flat), clock)
}

fn filled_form(number: &str) -> OrderForm {
    let mut form = OrderForm::new();
    form.set_extra_accessory(true);
    form.set_order_number(number);
    form.set_celda(Some("Celda 10".into()));
    form.update_accessory(0, AccessoryLine::new(AccessoryType::Guantes, 2));
    form
}

#[test]
fn disabled_form_is_rejected_without_store_call() {
    let mut svc = service();
    let mut form = OrderForm::new();
    form.set_order_number("ORD-1");
    assert!(!form.submit(&mut svc));
    assert_eq!(form.banner().unwrap().kind, BannerKind::Rejected);
    assert_eq!(svc.store().calls(), 0);
}

#[test]
fn empty_number_shows_banner_and_keeps_fields() {
    let mut svc = service();
    let mut form = filled_form("");
    assert!(!form.submit(&mut svc));
    assert_eq!(form.banner().unwrap().message, "Número de orden es requerido");
    assert_eq!(form.accessories()[0], AccessoryLine::new(AccessoryType::Guantes, 2));
    assert_eq!(svc.store().calls(), 0);
}

#[test]
fn invalid_celda_rejected_client_side() {
    let mut svc = service();
    let mut form = filled_form("ORD-2");
    form.set_celda(Some("Celda 99".into()));
    assert!(!form.submit(&mut svc));
    assert!(form.banner().unwrap().message.starts_with("Celda inválida"));
    assert_eq!(svc.store().calls(), 0);
}

#[test]
fn successful_submit_resets_and_refreshes() {
    let mut svc = service();
    let mut form = filled_form("ORD-3");
    form.add_accessory();
    assert!(form.submit(&mut svc));
    let banner = form.banner().unwrap();
    assert_eq!(banner.kind, BannerKind::Success);
    assert_eq!(banner.message, "Orden agregada exitosamente");
    assert!(form.is_disabled());
    assert_eq!(form.accessories().len(), 1);
    assert_eq!(form.orders().len(), 1);
    assert_eq!(form.orders()[0].accessories.len(), 2);
    assert!(!form.is_loading());
}

#[test]
fn close_with_wrong_confirmation_leaves_order_open() {
    let mut svc = service();
    let mut form = filled_form("ORD-4");
    assert!(form.submit(&mut svc));
    let id = form.orders()[0].id;
    let calls_before = svc.store().calls();

    form.set_confirmation(id, "ORD-4 ");
    assert!(!form.close(&mut svc, id, true));
    assert_eq!(form.banner().unwrap().kind, BannerKind::Rejected);
    assert_eq!(svc.store().calls(), calls_before);
    assert!(!form.orders()[0].is_closed);

    form.set_confirmation(id, "ORD-4");
    assert!(form.close(&mut svc, id, true));
    assert_eq!(form.banner().unwrap().message, "Orden cerrada exitosamente");
    assert!(form.orders()[0].is_closed);
    assert_eq!(form.confirmation(id), "");
}

#[test]
fn filter_is_kept_across_refreshes() {
    let mut svc = service();
    let mut first = filled_form("KEEP-1");
    assert!(first.submit(&mut svc));
    let mut second = filled_form("OTHER-2");
    assert!(second.submit(&mut svc));

    let mut form = OrderForm::new();
    form.apply_filter(&svc, OrderFilter::all().with_search("keep"));
    assert_eq!(form.orders().len(), 1);
    form.refresh(&svc);
    assert_eq!(form.orders().len(), 1);
    assert_eq!(form.filter().search_term(), Some("keep"));
}

#[test]
fn backend_failure_is_reported_verbatim() {
    let mut svc = OrderService::new(InMemoryOrderStore::failing(SchemaLayout::Flat, "timeout"));
    let mut form = filled_form("ORD-5");
    assert!(!form.submit(&mut svc));
    let banner = form.banner().unwrap();
    assert_eq!(banner.kind, BannerKind::Failed);
    assert_eq!(banner.message, "Get error: timeout");
}

#[test]
fn saved_order_stays_success_when_reload_fails() {
    let mut svc = OrderService::new(InMemoryOrderStore::failing_on(SchemaLayout::Flat, "list", "timeout"));
    let mut form = filled_form("ORD-6");
    assert!(form.submit(&mut svc));
    assert_eq!(svc.store().len(), 1);
    let banner = form.banner().unwrap();
    assert_eq!(banner.kind, BannerKind::Success);
    assert_eq!(banner.message, "Orden agregada exitosamente. Database error: timeout");

    form.set_confirmation(1, "ORD-6");
    assert!(form.close(&mut svc, 1, true));
    let banner = form.banner().unwrap();
    assert_eq!(banner.kind, BannerKind::Success);
    assert!(banner.message.starts_with("Orden cerrada exitosamente."));
}

#[test]
fn oversized_quantity_never_reaches_the_store() {
    let mut svc = service();
    let mut form = filled_form("ORD-7");
    form.update_accessory(0, AccessoryLine::new(AccessoryType::Guantes, 3_000_000_000));
    assert!(!form.submit(&mut svc));
    assert_eq!(form.banner().unwrap().kind, BannerKind::Rejected);
    assert_eq!(svc.store().calls(), 0);
}
