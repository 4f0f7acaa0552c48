use chrono::{TimeZone, Utc};
use order_domain::{AccessoryLine, AccessoryType, Celda, Order, Placement, SchemaLayout};
use order_export::{render, ExportError, ExportFormat, ExportTable};

fn order(id: i64, number: &str, closed: bool) -> Order {
    Order { id,
            order_number: number.to_string(),
            accessories: vec![AccessoryLine::new(AccessoryType::Bolsa, 2), AccessoryLine::new(AccessoryType::Gorra, 1)],
            extra_accessory: true,
            placement: Placement::Celda(Celda::C11),
            order_date: Utc.with_ymd_and_hms(2024, 4, 2, 10, 15, 0).unwrap(),
            is_closed: closed,
            accessories_added: closed }
}

fn displayed(n: usize) -> Vec<Order> { (0..n).map(|i| order(i as i64 + 1, &format!("ORD-{i}"), i % 2 == 0)).collect() }

#[test]
fn one_row_per_displayed_order() {
    let orders = displayed(3);
    let table = ExportTable::from_orders(&orders, SchemaLayout::Flat);
    assert_eq!(table.len(), orders.len());
    assert_eq!(table.headers[5], "Celda");
    assert_eq!(table.rows[0][2], "bolsa x2, gorra x1");
    assert_eq!(table.rows[0][3], "3");
    assert_eq!(table.rows[0][5], "Celda 11");
    assert_eq!(table.rows[0][7], "Agregados");
    assert_eq!(table.rows[1][7], "Abierta");
}

#[test]
fn normalized_layout_uses_selected_column() {
    let mut o = order(1, "N-1", false);
    o.placement = Placement::Selected(true);
    let table = ExportTable::from_orders(&[o], SchemaLayout::Normalized);
    assert_eq!(table.headers[5], "Seleccionado");
    assert_eq!(table.rows[0][5], "Sí");
}

#[test]
fn empty_export_is_rejected() {
    let table = ExportTable::from_orders(&[], SchemaLayout::Flat);
    let err = render(&table, ExportFormat::Pdf).unwrap_err();
    assert!(matches!(err, ExportError::Empty));
    assert_eq!(err.to_string(), "No hay datos para exportar");
}

#[test]
fn xlsx_is_a_zip_container() {
    let table = ExportTable::from_orders(&displayed(5), SchemaLayout::Flat);
    let bytes = render(&table, ExportFormat::Xlsx).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn pdf_paginates_long_reports() {
    let many = order_export::pdf::rows_per_page() * 2 + 1;
    let table = ExportTable::from_orders(&displayed(many), SchemaLayout::Flat);
    let bytes = render(&table, ExportFormat::Pdf).unwrap();
    assert_eq!(&bytes[..4], b"%PDF");
}
