//! Fabric cloud agent REST API client
//!
//! A Rust client library for the private-cloud fabric's cloud agent.
//! Provides type-safe models and methods for the network and storage
//! resources the cluster provider reconciles.
//!
//! # Example
//!
//! ```no_run
//! use fabric_client::FabricClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a client
//! let client = FabricClient::new(
//!     "https://agent.fabric.local:55000".to_string(),
//!     "your-api-token".to_string(),
//! )?;
//!
//! // Fetch a virtual network
//! match client.get_virtual_network("rg1", "vnet-a").await {
//!     Ok(vnet) => println!("found {}", vnet.name),
//!     Err(err) if err.is_not_found() => println!("absent"),
//!     Err(err) => return Err(err.into()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Network Operations**: Get, create, and delete virtual networks
//! - **Storage Operations**: Get, create, and delete virtual hard disks,
//!   optionally scoped by storage container
//! - **Error Classification**: not-found is a distinct error class so
//!   reconcilers can treat absence as an expected condition
//! - **Mocking**: `test-util` feature exposes an in-memory mock client

pub mod client;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod fabric_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::FabricClient;
pub use error::FabricError;
pub use fabric_trait::{VirtualHardDiskClient, VirtualNetworkClient};
pub use models::*;
#[cfg(feature = "test-util")]
pub use mock::MockFabricClient;
