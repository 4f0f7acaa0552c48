use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use order_domain::SchemaLayout;

#[derive(Debug, Parser)]
#[command(author, version, about = "Órdenes de accesorios: alta, listado, cierre y exportación")]
pub struct Cli {
    /// Backend de datos. Sin valor: postgres si hay DATABASE_URL, rest si hay
    /// SUPABASE_URL, memoria en otro caso.
    #[arg(long, value_enum, env = "ORDERS_BACKEND", global = true)]
    pub backend: Option<BackendKind>,
    /// Esquema de tablas (`normalized` o `flat`).
    #[arg(long, env = "ORDERS_SCHEMA_LAYOUT", global = true)]
    pub layout: Option<SchemaLayout>,
    /// Salida en JSON.
    #[arg(long, global = true)]
    pub json: bool,
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    Postgres,
    Rest,
    Memory,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Postgres => "postgres",
            BackendKind::Rest => "rest",
            BackendKind::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Outcome {
    /// Los accesorios se agregaron.
    Agregados,
    /// Se cerró sin agregar los accesorios.
    NoAgregados,
}

impl Outcome {
    pub fn accessories_added(&self) -> bool { matches!(self, Outcome::Agregados) }
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Texto a buscar en número de orden, tipo de accesorio o celda.
    #[arg(long, short)]
    pub search: Option<String>,
    /// Día de la orden, AAAA-MM-DD.
    #[arg(long, short)]
    pub date: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Agrega una orden.
    Add {
        #[arg(long, short)]
        number: String,
        /// `tipo[:cantidad]`, repetible. Ej: `--accessory bolsa:2`.
        #[arg(long = "accessory", short = 'a', required = true)]
        accessories: Vec<String>,
        /// Marca "Accesorio Extra" (sin esto el formulario está deshabilitado).
        #[arg(long)]
        extra: bool,
        #[arg(long)]
        celda: Option<String>,
        #[arg(long)]
        selected: bool,
    },
    /// Lista órdenes, opcionalmente filtradas.
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Cierra una orden; `--confirm` debe repetir el número exacto.
    Close {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        confirm: String,
        #[arg(long, value_enum)]
        outcome: Outcome,
    },
    /// Exporta las órdenes listadas a Excel o PDF.
    Export {
        #[arg(long, short, default_value = "xlsx")]
        format: String,
        #[arg(long, short, default_value = ".")]
        out: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Diagnóstico de conexión y entorno.
    Debug,
    /// Aplica las migraciones del esquema (sólo postgres).
    Migrate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_repeated_accessories() {
        let cli = Cli::try_parse_from(["orders", "add", "-n", "ORD-1", "-a", "bolsa:2", "-a", "gorra", "--extra",
                                       "--celda", "Celda 10"]).unwrap();
        match cli.command {
            Command::Add { number,
                           accessories,
                           extra,
                           celda,
                           .. } => {
                assert_eq!(number, "ORD-1");
                assert_eq!(accessories, vec!["bolsa:2", "gorra"]);
                assert!(extra);
                assert_eq!(celda.as_deref(), Some("Celda 10"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn close_requires_outcome() {
        assert!(Cli::try_parse_from(["orders", "close", "--id", "3", "--confirm", "X"]).is_err());
        let cli = Cli::try_parse_from(["orders", "close", "--id", "3", "--confirm", "X", "--outcome", "no-agregados"])
            .unwrap();
        assert!(matches!(cli.command, Command::Close { outcome: Outcome::NoAgregados, .. }));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["orders", "list", "--backend", "memory", "--layout", "normalized", "--json",
                                       "-s", "bolsa"]).unwrap();
        assert_eq!(cli.backend, Some(BackendKind::Memory));
        assert_eq!(cli.layout, Some(SchemaLayout::Normalized));
        assert!(cli.json);
    }
}
