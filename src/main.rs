use tracing::{error, info, warn};

use podium::{Config, Database};

#[tokio::main]
async fn main() {
    // Load configuration
    let mut config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    config.apply_env_overrides();

    // Initialize logging
    if let Err(e) = podium::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        podium::logging::init_console_only(&config.logging.level);
    }

    info!("Podium - forum core");

    if let Err(e) = config.validate() {
        warn!("{e}; continuing with the configured values");
    }

    match Database::open(&config.database.path).await {
        Ok(db) => match db.schema_version().await {
            Ok(version) => info!(
                path = %config.database.path,
                version,
                "Database ready"
            ),
            Err(e) => error!("Failed to read schema version: {e}"),
        },
        Err(e) => {
            error!("Failed to open database {}: {e}", config.database.path);
            std::process::exit(1);
        }
    }
}
