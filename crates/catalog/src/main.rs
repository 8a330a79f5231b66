use std::sync::Arc;

use marche_catalog::{CatalogConfig, ItemsListStore, MemoryStore};
use marche_core::entity::Item;
use marche_core::events::{EventBus, Section};
use serde_json::json;
use tokio::sync::broadcast::error::TryRecvError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience)
    let _ = dotenvy::dotenv();

    let config = CatalogConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::info!(fixture = %config.fixture_path.display(), "Loading catalog fixture");

    let store = MemoryStore::load_fixture(&config.fixture_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load fixture: {e}"))?;

    let items = ItemsListStore::new(
        Arc::new(store),
        EventBus::new(config.event_bus_capacity),
        Item::base_query().limit(config.recommended_limit),
        Item::base_query().limit(config.hot_ranking_limit),
    );
    let mut events = items.subscribe();

    items.reload_all().await?;

    loop {
        match events.try_recv() {
            Ok(event) => tracing::info!(?event, "Catalog event"),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Missed catalog events")
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }

    let recommended = items.items(Section::Recommended).await;
    let hot_ranking = items.items(Section::HotRanking).await;
    let output = json!({
        "recommended": recommended,
        "hotRanking": hot_ranking,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
