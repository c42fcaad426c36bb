//! Expedition node - the main application entry point.
//!
//! Architecture:
//! - Single daemon process with shared RocksDB storage
//! - HTTP API for the club's web client
//! - Unix admin socket for local user management (expedicao-admin CLI)

use crate::admin_socket::AdminSocket;
use crate::api;
use crate::club::Club;
use crate::error::{Error, Result};
use crate::storage::Storage;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

const DEFAULT_DATA_DIR: &str = "./expedicao-data";
const DEFAULT_API_ADDR: &str = "0.0.0.0:8080";

/// Configuration for a node.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Data directory for storage
    pub data_dir: PathBuf,

    /// HTTP API listen address
    pub api_addr: SocketAddr,

    /// Admin socket path (for the expedicao-admin CLI)
    pub admin_socket: PathBuf,
}

impl NodeConfig {
    /// Create config from environment variables with sensible defaults.
    ///
    /// - `EXPEDICAO_DATA_DIR` (default `./expedicao-data`)
    /// - `EXPEDICAO_API_ADDR` (default `0.0.0.0:8080`)
    /// - `EXPEDICAO_ADMIN_SOCKET` (default `<data_dir>/admin.sock`)
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_dir =
            PathBuf::from(var("EXPEDICAO_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()));

        let api_addr = var("EXPEDICAO_API_ADDR").unwrap_or_else(|| DEFAULT_API_ADDR.to_string());
        let api_addr = api_addr
            .parse()
            .map_err(|e| Error::Config(format!("invalid EXPEDICAO_API_ADDR {:?}: {}", api_addr, e)))?;

        let admin_socket = var("EXPEDICAO_ADMIN_SOCKET")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("admin.sock"));

        Ok(Self {
            data_dir,
            api_addr,
            admin_socket,
        })
    }

    /// Defaults rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Self {
            admin_socket: data_dir.join("admin.sock"),
            api_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            data_dir,
        }
    }
}

/// Shared state for the node. Mutating handlers take the write lock.
pub struct NodeState {
    pub club: Club,
    pub config: NodeConfig,
}

/// A running expedition node.
pub struct Node {
    state: Arc<RwLock<NodeState>>,
    config: NodeConfig,
}

impl Node {
    pub async fn new(config: NodeConfig) -> Result<Self> {
        // Ensure data directory exists
        std::fs::create_dir_all(&config.data_dir)?;

        let storage = Arc::new(Storage::open(&config.data_dir)?);
        storage.init_default_settings()?;

        let state = Arc::new(RwLock::new(NodeState {
            club: Club::new(storage),
            config: config.clone(),
        }));

        Ok(Self { state, config })
    }

    /// Get the shared state (for API handlers).
    pub fn state(&self) -> api::AppState {
        Arc::clone(&self.state)
    }

    /// Run the node: admin socket in the background, HTTP API until shutdown.
    pub async fn run(self) -> Result<()> {
        tracing::info!("Expedition node starting");
        tracing::info!("  API: http://{}", self.config.api_addr);
        tracing::info!("  Admin: {:?}", self.config.admin_socket);
        tracing::info!("  Data: {:?}", self.config.data_dir);

        let admin_socket = AdminSocket::new(self.state(), &self.config.admin_socket);
        tokio::spawn(async move {
            if let Err(e) = admin_socket.run().await {
                tracing::error!("Admin socket error: {}", e);
            }
        });

        let app = api::build_router(self.state());

        let listener = tokio::net::TcpListener::bind(self.config.api_addr).await?;
        tracing::info!("HTTP server listening on {}", self.config.api_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        // Leave no stale socket behind
        let _ = std::fs::remove_file(&self.config.admin_socket);
        tracing::info!("Expedition node stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
