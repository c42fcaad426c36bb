//! Expedition node binary
//!
//! Serves the fishing club's trip manager over HTTP.

use expedicao_node::{Node, NodeConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expedicao_node=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting expedition node");

    let config = NodeConfig::from_env()?;

    let node = Node::new(config).await?;
    node.run().await?;

    Ok(())
}
