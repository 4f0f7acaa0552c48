//! Demo de punta a punta: carga órdenes de ejemplo, busca, cierra una y
//! exporta el listado. En memoria por defecto; con el feature `pg_demo`
//! usa Postgres vía `DATABASE_URL`.

use accessory_orders::demo::seed_demo_orders;
use accessory_orders::order_core::{DebugReport, EnvironmentInfo};
use accessory_orders::order_export::{render, ExportFormat, ExportTable};
use accessory_orders::{OrderFilter, OrderForm, OrderService, OrderStore};
use chrono::Utc;
use tracing_subscriber::EnvFilter;

fn open_store() -> Result<Box<dyn OrderStore>, String> {
    #[cfg(feature = "pg_demo")]
    {
        use accessory_orders::order_persistence::{build_pool_from_env, PgFlatOrderStore, PgNormalizedOrderStore,
                                                  PoolProvider};
        use accessory_orders::SchemaLayout;
        let (pool, cfg) = build_pool_from_env().map_err(|e| e.to_string())?;
        let provider = PoolProvider { pool };
        Ok(match cfg.layout {
            SchemaLayout::Normalized => Box::new(PgNormalizedOrderStore::new(provider)),
            SchemaLayout::Flat => Box::new(PgFlatOrderStore::new(provider)),
        })
    }
    #[cfg(not(feature = "pg_demo"))]
    {
        Ok(Box::new(accessory_orders::InMemoryOrderStore::default()))
    }
}

fn run() -> Result<(), String> {
    let mut service = OrderService::new(open_store()?);
    let env = EnvironmentInfo { mode: "development".into(),
                                backend: service.store().backend_name().into(),
                                layout: service.layout().to_string(),
                                target: "demo".into(),
                                base_path: "/".into(),
                                api_key_present: None };
    println!("{}\n", DebugReport::gather(service.store(), env, Utc::now()).render());

    let created = seed_demo_orders(&mut service).map_err(|e| e.to_string())?;
    println!("Órdenes creadas: {}", created.len());

    let mut form = OrderForm::new();
    form.apply_filter(&service, OrderFilter::all().with_search("guantes"));
    println!("Búsqueda 'guantes': {} orden(es)", form.orders().len());

    form.apply_filter(&service, OrderFilter::all());
    if let Some(order) = form.orders().last().cloned() {
        form.set_confirmation(order.id, order.order_number.clone());
        form.close(&mut service, order.id, true);
        if let Some(banner) = form.banner() {
            println!("{}: {}", order.order_number, banner.message);
        }
    }

    for o in form.orders() {
        println!("  #{:<4} {:<10} {:<45} {:<9} {}",
                 o.id,
                 o.order_number,
                 o.accessories_summary(),
                 o.placement.label(),
                 o.status().label());
    }

    let table = ExportTable::from_orders(form.orders(), service.layout());
    for format in [ExportFormat::Xlsx, ExportFormat::Pdf] {
        let bytes = render(&table, format).map_err(|e| e.to_string())?;
        println!("Export {format}: {} filas, {} bytes", table.len(), bytes.len());
    }
    Ok(())
}

fn main() {
    let _ = dotenvy::dotenv();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
