mod backend;
mod cli;
mod commands;
mod error;
mod logging;
mod settings;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::Cli;

fn main() -> ExitCode {
    // .env antes de parsear: clap lee ORDERS_BACKEND / ORDERS_SCHEMA_LAYOUT del entorno.
    order_persistence::init_dotenv();
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);
    match commands::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(&e)
        }
    }
}
