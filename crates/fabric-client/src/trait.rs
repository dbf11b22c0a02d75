//! Client traits for mocking
//!
//! These traits abstract the cloud agent client so the reconciliation
//! services can be unit tested against in-memory implementations. The
//! concrete `FabricClient` implements both; `MockFabricClient` mirrors it
//! for tests. All async methods must be `Send` to work with Tokio's
//! work-stealing runtime.

use crate::error::FabricError;
use crate::models::{VirtualHardDisk, VirtualNetwork};

/// Virtual network operations against the cloud agent
///
/// Errors are classifiable via [`FabricError::is_not_found`] so callers can
/// tell an absent resource apart from a failed call.
#[async_trait::async_trait]
pub trait VirtualNetworkClient: Send + Sync {
    async fn get(&self, group: &str, name: &str) -> Result<VirtualNetwork, FabricError>;
    async fn create_or_update(
        &self,
        group: &str,
        name: &str,
        vnet: &VirtualNetwork,
    ) -> Result<VirtualNetwork, FabricError>;
    async fn delete(&self, group: &str, name: &str) -> Result<(), FabricError>;
}

/// Virtual hard disk operations against the cloud agent
///
/// Disks are additionally scoped by an optional storage container.
#[async_trait::async_trait]
pub trait VirtualHardDiskClient: Send + Sync {
    async fn get(
        &self,
        group: &str,
        container: Option<&str>,
        name: &str,
    ) -> Result<VirtualHardDisk, FabricError>;
    async fn create_or_update(
        &self,
        group: &str,
        container: Option<&str>,
        name: &str,
        disk: &VirtualHardDisk,
    ) -> Result<VirtualHardDisk, FabricError>;
    async fn delete(
        &self,
        group: &str,
        container: Option<&str>,
        name: &str,
    ) -> Result<(), FabricError>;
}
