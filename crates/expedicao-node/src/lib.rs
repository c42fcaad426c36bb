//! Expedição dos Amigos - trip manager for a fishing club
//!
//! Keeps the club's people, expeditions and money in one place: who goes on
//! each trip, what was bought and by whom, how the bill splits (see
//! [`expedicao_rateio`]), monthly dues and the general cash ledger.
//!
//! # Architecture
//!
//! - **Models**: Records (Profile, Expedition, Purchase, MonthlyFee, ...)
//! - **Storage**: RocksDB-backed persistent storage
//! - **Club**: Domain operations over storage
//! - **API**: HTTP endpoints for the web client
//! - **Admin Socket**: Unix socket for local admin commands (expedicao-admin CLI)
//!
//! # Example
//!
//! ```no_run
//! use expedicao_node::{Node, NodeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = NodeConfig::from_env()?;
//!     let node = Node::new(config).await?;
//!     node.run().await?;
//!     Ok(())
//! }
//! ```

pub mod admin_socket;
pub mod api;
pub mod club;
pub mod error;
pub mod models;
pub mod node;
pub mod storage;

pub use club::Club;
pub use error::{Error, Result};
pub use models::{Expedition, LedgerEntry, MonthlyFee, Profile, Purchase, User};
pub use node::{Node, NodeConfig};
pub use storage::Storage;
