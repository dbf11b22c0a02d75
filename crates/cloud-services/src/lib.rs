//! Reconciliation services for fabric cluster resources
//!
//! Each cloud resource kind the provider manages (virtual networks, virtual
//! hard disks) gets a service exposing the same Get/Reconcile/Delete
//! contract against the fabric's cloud agent:
//!
//! - reconcile is create-if-absent: resources are immutable once created,
//!   so an existing resource is already satisfied and repeated calls with
//!   the same spec mutate at most once
//! - delete is idempotent and gated on an ownership tag, so resources
//!   created by another controller (or by hand) are never destroyed
//! - not-found is a distinct, expected error class rather than a failure
//!
//! The services never retry; the reconciliation loop hosting them owns
//! retry and backoff for transient upstream failures.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cloud_services::scope::{Authorizer, Scope};
//! use cloud_services::services::{OwnershipTag, ResourceService};
//! use cloud_services::services::virtualnetworks::{VirtualNetworkService, VirtualNetworkSpec};
//! use cloud_services::telemetry::LogSink;
//! use fabric_client::FabricClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(FabricClient::new(
//!     "https://agent.fabric.local:55000".to_string(),
//!     "api-token".to_string(),
//! )?);
//! let scope = Arc::new(Scope::new(
//!     "rg1",
//!     "agent.fabric.local",
//!     Authorizer::from_token("api-token"),
//!     "FabricCluster/demo",
//! ));
//!
//! let vnets = VirtualNetworkService::new(
//!     scope,
//!     client,
//!     Arc::new(LogSink),
//!     OwnershipTag::for_controller("fabric-provider"),
//! );
//! vnets
//!     .reconcile(&VirtualNetworkSpec {
//!         name: "vnet-a".to_string(),
//!         group: "rg1".to_string(),
//!         cidr: "10.0.0.0/24".to_string(),
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod scope;
pub mod services;
pub mod telemetry;
#[cfg(test)]
mod test_utils;

pub use error::ServiceError;
pub use scope::{Authorizer, Scope};
pub use services::{OwnershipTag, ResourceService};
