use std::sync::Arc;
use voter_backend::{
    build_rocket,
    config::{self, StoreKind, VoterConfig},
    queries::PgStore,
    store::MemoryStore,
    DocumentStore, StoreResult,
};
use tracing::{info, error, warn};
use tracing_subscriber::{fmt, EnvFilter};

async fn open_store(config: &VoterConfig) -> StoreResult<Arc<dyn DocumentStore>> {
    match config.store {
        StoreKind::Memory => {
            info!("🧠 Using in-memory document store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreKind::Postgres => {
            info!("🐘 Using PostgreSQL document store");
            let store = PgStore::connect_lazy(config)?;
            // The store may come up after us; requests fail until it does.
            if let Err(e) = store.ping().await {
                warn!("Error connecting to store: {}, store might not be available, continuing...", e);
            }
            Ok(Arc::new(store))
        }
    }
}

#[rocket::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,voter_backend=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    info!("🚀 Starting voter service");

    let figment = config::figment();
    let voter_config = match VoterConfig::from_figment(&figment) {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let store = match open_store(&voter_config).await {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to open document store: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = build_rocket(figment, Arc::clone(&store)).launch().await {
        error!("Server error: {}", e);
    }

    store.close().await;
    info!("Server stopped");
}
