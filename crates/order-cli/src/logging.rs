//! Suscriptor `tracing` para el binario. Los registros `log` de las
//! librerías entran por el puente `tracing-log`.

use tracing_subscriber::EnvFilter;

/// Nivel base desde `--log-level`, siempre sobreescribible con `RUST_LOG`.
pub fn init_logging(level: &str) {
    let default = format!("{level},diesel=warn,reqwest=warn");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt().with_env_filter(filter)
                                     .with_target(true)
                                     .with_writer(std::io::stderr)
                                     .try_init();
}
