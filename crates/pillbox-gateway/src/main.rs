use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use pillbox_gateway::app::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pillbox_gateway=info,tower_http=debug".into()),
        )
        .init();

    // load config: explicit path > PILLBOX_CONFIG env > ~/.pillbox/pillbox.toml
    let config_path = std::env::var("PILLBOX_CONFIG").ok();
    let config = pillbox_core::config::PillboxConfig::load(config_path.as_deref())
        .unwrap_or_else(|e| {
            tracing::warn!("Config load failed ({}), using defaults", e);
            pillbox_core::config::PillboxConfig::default()
        });

    let bind = config.gateway.bind.clone();
    let port = config.gateway.port;

    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");

    let db = rusqlite::Connection::open(db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    let store = pillbox_store::PlanStore::new(db)?;

    // Seed the shared pill lookup table so edit flows can resolve colors even
    // for users created before this process started.
    store.ensure_pill_types(&pillbox_core::types::PillColor::ALL)?;

    // MQTT side channel: publisher for the write path, receiver for inbound
    // sync requests. Connection failures surface in the event-loop task's
    // logs; the HTTP surface stays up either way.
    let (publisher, inbound_rx) = pillbox_relay::connect(&config.broker);
    let relay = Arc::new(pillbox_relay::Relay::new(
        store.clone(),
        Arc::new(publisher),
        config.broker.outbound_topic.clone(),
    ));
    tokio::spawn(Arc::clone(&relay).run(inbound_rx));

    let state = Arc::new(AppState::new(config, store, relay));
    let router = build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("pillbox gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
