use chrono::Duration;
use domain::access_token::{AccessTokenIssuer, AccessTokenKeys};
use domain::credit_card::MockCreditCardProcessor;
use events::EventPublisher;
use log::*;
use service::{config::Config, logging::Logger};
use sse::SseDomainEventHandler;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    info!(
        "Starting toy store ({} environment)",
        config.runtime_env()
    );

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = entity_api::schema::create_tables(&db).await {
        error!("Failed to create database schema: {e}");
        std::process::exit(1);
    }

    if config.seed_database {
        info!("Seeding database [{}]...", config.database_url());
        if let Err(e) = entity_api::seed_database(&db).await {
            error!("Failed to seed database: {e}");
            std::process::exit(1);
        }
    }

    let keys = match load_access_token_keys(&config) {
        Ok(keys) => keys,
        Err(e) => {
            error!("Failed to load access token keys: {e}");
            std::process::exit(1);
        }
    };
    let access_token_issuer = AccessTokenIssuer::new(
        keys,
        Duration::seconds(config.access_token_lifetime_seconds as i64),
        Duration::seconds(config.sse_access_token_lifetime_seconds as i64),
    );

    let sse_manager = Arc::new(sse::Manager::new());
    let event_publisher = EventPublisher::new()
        .with_handler(Arc::new(SseDomainEventHandler::new(sse_manager.clone())));
    let credit_card_processor =
        MockCreditCardProcessor::new(&config.declined_credit_card_numbers);

    let service_state = service::AppState::new(config, &db);
    let app_state = web::AppState::new(
        service_state,
        Arc::new(event_publisher),
        sse_manager,
        access_token_issuer,
        Arc::new(credit_card_processor),
    );

    if let Err(e) = web::init_server(app_state).await {
        error!("Server stopped: {e}");
        std::process::exit(1);
    }
}

/// Reads the configured PKCS#8 key, or generates a key pair that lasts until the
/// process exits.
fn load_access_token_keys(config: &Config) -> Result<AccessTokenKeys, String> {
    match config.access_token_key_path() {
        Some(path) => {
            info!("Loading access token key from {}", path.display());
            let pem = std::fs::read_to_string(path)
                .map_err(|e| format!("unable to read {}: {e}", path.display()))?;
            AccessTokenKeys::from_pkcs8_pem(&pem).map_err(|e| e.to_string())
        }
        None => {
            warn!("No access token key configured; generating one. Tokens will not survive a restart");
            AccessTokenKeys::generate().map_err(|e| e.to_string())
        }
    }
}
