//! Un handler por subcomando. Alta y cierre pasan por `OrderForm`, igual que
//! en la interfaz: validación local primero, luego el backend.

use chrono::{Local, Utc};
use order_core::{BannerKind, DebugReport, InMemoryOrderStore, OrderForm, OrderService};
use order_domain::{AccessoryLine, Order, OrderFilter, SchemaLayout};
use order_export::{write_export, ExportFormat, ExportTable};
use order_persistence::{build_pool, DbConfig};
use tracing::{debug, warn};

use crate::backend::{environment, open_store, DynStore};
use crate::cli::{BackendKind, Cli, Command, FilterArgs};
use crate::error::CliError;
use crate::settings::AppSettings;

type Service = OrderService<DynStore>;

pub fn run(cli: Cli) -> Result<(), CliError> {
    let settings = AppSettings::from_cli(&cli);
    debug!(?settings, "settings");
    match cli.command {
        Command::Add { number,
                       accessories,
                       extra,
                       celda,
                       selected } => {
            let lines = accessories.iter()
                                   .map(|raw| raw.parse::<AccessoryLine>())
                                   .collect::<Result<Vec<_>, _>>()?;
            let mut service = OrderService::new(open_store(&settings)?);
            add(&mut service, number, lines, extra, celda, selected, cli.json)
        }
        Command::List { filter } => {
            let filter = to_filter(&filter)?;
            let service = OrderService::new(open_store(&settings)?);
            let orders = service.search(&filter)?;
            print_orders(&orders, service.layout(), cli.json)
        }
        Command::Close { id, confirm, outcome } => {
            let mut service = OrderService::new(open_store(&settings)?);
            close(&mut service, id, confirm, outcome.accessories_added(), cli.json)
        }
        Command::Export { format, out, filter } => {
            let format: ExportFormat = format.parse()?;
            let filter = to_filter(&filter)?;
            let service = OrderService::new(open_store(&settings)?);
            let orders = service.search(&filter)?;
            let table = ExportTable::from_orders(&orders, service.layout());
            let path = write_export(&table, format, &out, Local::now().naive_local())?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Debug => debug_report(&settings, cli.json),
        Command::Migrate => migrate(&settings),
    }
}

fn to_filter(args: &FilterArgs) -> Result<OrderFilter, CliError> {
    let mut filter = OrderFilter::all();
    if let Some(term) = &args.search {
        filter = filter.with_search(term.clone());
    }
    if let Some(raw) = &args.date {
        filter = filter.with_date(OrderFilter::parse_date(raw)?);
    }
    Ok(filter)
}

/// Traduce el banner del formulario a resultado del proceso.
fn banner_result(form: &OrderForm, json: bool) -> Result<(), CliError> {
    let Some(banner) = form.banner() else {
        return Ok(());
    };
    match banner.kind {
        BannerKind::Success => {
            if !json {
                println!("{}", banner.message);
            }
            Ok(())
        }
        BannerKind::Rejected => Err(CliError::Rejected(banner.message.clone())),
        BannerKind::Failed => Err(CliError::Failed(banner.message.clone())),
    }
}

fn add(service: &mut Service,
       number: String,
       lines: Vec<AccessoryLine>,
       extra: bool,
       celda: Option<String>,
       selected: bool,
       json: bool)
       -> Result<(), CliError> {
    let mut form = OrderForm::new();
    let wanted = number.trim().to_string();
    form.set_extra_accessory(extra);
    form.set_order_number(number);
    form.set_celda(celda);
    form.set_selected(selected);
    for (idx, line) in lines.into_iter().enumerate() {
        if idx > 0 {
            form.add_accessory();
        }
        form.update_accessory(idx, line);
    }
    let saved = form.submit(service);
    banner_result(&form, json)?;
    if saved && json {
        if let Some(created) = form.orders().iter().find(|o| o.order_number == wanted) {
            println!("{}", serde_json::to_string_pretty(created)?);
        }
    }
    Ok(())
}

fn close(service: &mut Service, id: i64, confirm: String, accessories_added: bool, json: bool) -> Result<(), CliError> {
    let mut form = OrderForm::new();
    form.refresh(service);
    form.set_confirmation(id, confirm);
    let closed = form.close(service, id, accessories_added);
    banner_result(&form, json)?;
    if closed && json {
        if let Some(order) = form.orders().iter().find(|o| o.id == id) {
            println!("{}", serde_json::to_string_pretty(order)?);
        }
    }
    Ok(())
}

fn print_orders(orders: &[Order], layout: SchemaLayout, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(orders)?);
        return Ok(());
    }
    if orders.is_empty() {
        println!("No hay órdenes");
        return Ok(());
    }
    let placement = if layout.requires_celda() { "Celda" } else { "Sel." };
    println!("{:>6}  {:<16} {:<40} {:<9} {:<16} {}",
             "ID", "Número", "Accesorios", placement, "Fecha", "Estado");
    for o in orders {
        println!("{:>6}  {:<16} {:<40} {:<9} {:<16} {}",
                 o.id,
                 o.order_number,
                 o.accessories_summary(),
                 o.placement.label(),
                 o.order_date.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                 o.status().label());
    }
    Ok(())
}

fn debug_report(settings: &AppSettings, json: bool) -> Result<(), CliError> {
    let env = environment(settings);
    let store: DynStore = match open_store(settings) {
        Ok(store) => store,
        Err(e) => {
            warn!("backend unavailable: {e}");
            Box::new(InMemoryOrderStore::failing(settings.layout, e.to_string()))
        }
    };
    let report = DebugReport::gather(store.as_ref(), env, Utc::now());
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.render());
    }
    if report.is_healthy() {
        Ok(())
    } else {
        Err(CliError::Failed(format!("{} problema(s) detectado(s)", report.issues.len())))
    }
}

fn migrate(settings: &AppSettings) -> Result<(), CliError> {
    if settings.backend != BackendKind::Postgres {
        return Err(CliError::Usage(format!("migrate sólo aplica al backend postgres (actual: {})",
                                           settings.backend.as_str())));
    }
    let cfg = DbConfig::from_env()?;
    build_pool(&cfg.url, 1, 1, settings.layout)?;
    println!("Migraciones aplicadas (esquema {})", settings.layout);
    Ok(())
}
