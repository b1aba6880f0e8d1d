//! Shopify inventory connector demo entrypoint.
//!
//! Exercises the client against live configuration: lists the shop's
//! locations, then prints an inventory summary and a product-level listing
//! for one of them.

#![forbid(unsafe_code)]

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shopify_inventory::{InventoryClient, ShopifyConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Faults are logged; the process exits normally either way.
    if let Err(error) = run().await {
        tracing::error!(%error, "demo run failed");
    }
    Ok(())
}

async fn run() -> Result<()> {
    let config = ShopifyConfig::from_env()?;
    let client = InventoryClient::new(&config)?;

    let locations = client.list_locations().await?;
    println!("Available locations:");
    for location in &locations {
        println!(
            "  - {} (ID: {}) - {}",
            location.name, location.id, location.city
        );
    }

    let Some(location) = locations.get(1).or_else(|| locations.first()) else {
        println!("No locations found.");
        return Ok(());
    };

    let summary = client.location_summary(&location.gid).await?;
    println!("Inventory summary for {}:", summary.location_name);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    let detailed = client
        .list_inventory_with_products(&location.gid, 50)
        .await;
    println!("{}", serde_json::to_string_pretty(&detailed.items)?);
    if let Some(error) = detailed.error {
        tracing::warn!(%error, "product listing stopped early");
    }

    Ok(())
}
