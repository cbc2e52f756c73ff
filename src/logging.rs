//! Inicialización del logger (`env_logger` detrás de la fachada `log`).

use env_logger::Env;

/// Nivel por defecto cuando `RUST_LOG` no está definido.
pub fn default_level(debug: bool) -> &'static str {
    if debug { "debug" } else { "info" }
}

/// Inicializa el logger global; llamadas repetidas no tienen efecto.
pub fn init(debug: bool) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_level(debug))).format_timestamp_millis()
                                                                                                .try_init();
}
