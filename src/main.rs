use glossary_api::{logging, startup, AppConfig};
use log::error;

fn main() {
    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[glossary-api] {e}");
            std::process::exit(2);
        }
    };
    logging::init(config.debug);

    match startup::run(&config) {
        Ok((_pool, Some(summary))) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => error!("cannot render load summary: {e}"),
        },
        Ok((_pool, None)) => {}
        Err(e) => {
            error!("startup failed: {e}");
            std::process::exit(1);
        }
    }
}
