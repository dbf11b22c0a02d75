//! Mock cloud agent client for unit testing
//!
//! This module provides in-memory implementations of the client traits that
//! can be used in unit tests without a reachable cloud agent. Resources are
//! stored keyed by (group, name), and every mutating call is counted so
//! tests can assert exactly how often a service hit the agent.

use crate::error::FabricError;
use crate::fabric_trait::{VirtualHardDiskClient, VirtualNetworkClient};
use crate::models::{VirtualHardDisk, VirtualNetwork};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock cloud agent client
///
/// Cloning shares the underlying stores, so tests keep one handle for
/// seeding and assertions while the service under test holds another.
#[derive(Clone, Default)]
pub struct MockFabricClient {
    vnets: Arc<Mutex<HashMap<(String, String), VirtualNetwork>>>,
    disks: Arc<Mutex<HashMap<(String, String), VirtualHardDisk>>>,
    vnet_create_calls: Arc<Mutex<u64>>,
    vnet_delete_calls: Arc<Mutex<u64>>,
    disk_create_calls: Arc<Mutex<u64>>,
    disk_delete_calls: Arc<Mutex<u64>>,
    // Injected failures, consumed by the next matching call of either kind
    get_failure: Arc<Mutex<Option<FabricError>>>,
    create_failure: Arc<Mutex<Option<FabricError>>>,
    delete_failure: Arc<Mutex<Option<FabricError>>>,
}

impl MockFabricClient {
    /// Create a new mock client with empty stores
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a virtual network (for test setup)
    pub fn add_virtual_network(&self, group: &str, vnet: VirtualNetwork) {
        self.vnets
            .lock()
            .unwrap()
            .insert((group.to_string(), vnet.name.clone()), vnet);
    }

    /// Seed a virtual hard disk (for test setup)
    pub fn add_virtual_hard_disk(&self, group: &str, disk: VirtualHardDisk) {
        self.disks
            .lock()
            .unwrap()
            .insert((group.to_string(), disk.name.clone()), disk);
    }

    /// Current stored state of a virtual network, if any
    pub fn virtual_network(&self, group: &str, name: &str) -> Option<VirtualNetwork> {
        self.vnets
            .lock()
            .unwrap()
            .get(&(group.to_string(), name.to_string()))
            .cloned()
    }

    /// Current stored state of a virtual hard disk, if any
    pub fn virtual_hard_disk(&self, group: &str, name: &str) -> Option<VirtualHardDisk> {
        self.disks
            .lock()
            .unwrap()
            .get(&(group.to_string(), name.to_string()))
            .cloned()
    }

    /// Number of create_or_update calls seen for virtual networks
    pub fn vnet_create_calls(&self) -> u64 {
        *self.vnet_create_calls.lock().unwrap()
    }

    /// Number of delete calls seen for virtual networks
    pub fn vnet_delete_calls(&self) -> u64 {
        *self.vnet_delete_calls.lock().unwrap()
    }

    /// Number of create_or_update calls seen for virtual hard disks
    pub fn disk_create_calls(&self) -> u64 {
        *self.disk_create_calls.lock().unwrap()
    }

    /// Number of delete calls seen for virtual hard disks
    pub fn disk_delete_calls(&self) -> u64 {
        *self.disk_delete_calls.lock().unwrap()
    }

    /// Fail the next get call (of either kind) with the given error
    pub fn fail_next_get(&self, err: FabricError) {
        self.get_failure.lock().unwrap().replace(err);
    }

    /// Fail the next create_or_update call (of either kind) with the given error
    pub fn fail_next_create(&self, err: FabricError) {
        self.create_failure.lock().unwrap().replace(err);
    }

    /// Fail the next delete call (of either kind) with the given error
    pub fn fail_next_delete(&self, err: FabricError) {
        self.delete_failure.lock().unwrap().replace(err);
    }

    fn take_failure(slot: &Arc<Mutex<Option<FabricError>>>) -> Option<FabricError> {
        slot.lock().unwrap().take()
    }
}

#[async_trait::async_trait]
impl VirtualNetworkClient for MockFabricClient {
    async fn get(&self, group: &str, name: &str) -> Result<VirtualNetwork, FabricError> {
        if let Some(err) = Self::take_failure(&self.get_failure) {
            return Err(err);
        }
        self.vnets
            .lock()
            .unwrap()
            .get(&(group.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| {
                FabricError::NotFound(format!(
                    "virtual network {} not found in group {}",
                    name, group
                ))
            })
    }

    async fn create_or_update(
        &self,
        group: &str,
        name: &str,
        vnet: &VirtualNetwork,
    ) -> Result<VirtualNetwork, FabricError> {
        *self.vnet_create_calls.lock().unwrap() += 1;
        if let Some(err) = Self::take_failure(&self.create_failure) {
            return Err(err);
        }
        self.vnets
            .lock()
            .unwrap()
            .insert((group.to_string(), name.to_string()), vnet.clone());
        Ok(vnet.clone())
    }

    async fn delete(&self, group: &str, name: &str) -> Result<(), FabricError> {
        *self.vnet_delete_calls.lock().unwrap() += 1;
        if let Some(err) = Self::take_failure(&self.delete_failure) {
            return Err(err);
        }
        self.vnets
            .lock()
            .unwrap()
            .remove(&(group.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| {
                FabricError::NotFound(format!(
                    "virtual network {} not found in group {}",
                    name, group
                ))
            })
    }
}

#[async_trait::async_trait]
impl VirtualHardDiskClient for MockFabricClient {
    async fn get(
        &self,
        group: &str,
        _container: Option<&str>,
        name: &str,
    ) -> Result<VirtualHardDisk, FabricError> {
        if let Some(err) = Self::take_failure(&self.get_failure) {
            return Err(err);
        }
        self.disks
            .lock()
            .unwrap()
            .get(&(group.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| {
                FabricError::NotFound(format!(
                    "virtual hard disk {} not found in group {}",
                    name, group
                ))
            })
    }

    async fn create_or_update(
        &self,
        group: &str,
        _container: Option<&str>,
        name: &str,
        disk: &VirtualHardDisk,
    ) -> Result<VirtualHardDisk, FabricError> {
        *self.disk_create_calls.lock().unwrap() += 1;
        if let Some(err) = Self::take_failure(&self.create_failure) {
            return Err(err);
        }
        self.disks
            .lock()
            .unwrap()
            .insert((group.to_string(), name.to_string()), disk.clone());
        Ok(disk.clone())
    }

    async fn delete(
        &self,
        group: &str,
        _container: Option<&str>,
        name: &str,
    ) -> Result<(), FabricError> {
        *self.disk_delete_calls.lock().unwrap() += 1;
        if let Some(err) = Self::take_failure(&self.delete_failure) {
            return Err(err);
        }
        self.disks
            .lock()
            .unwrap()
            .remove(&(group.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| {
                FabricError::NotFound(format!(
                    "virtual hard disk {} not found in group {}",
                    name, group
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AddressSpace, VirtualNetworkProperties};

    fn test_vnet(name: &str) -> VirtualNetwork {
        VirtualNetwork {
            name: name.to_string(),
            network_type: "Transparent".to_string(),
            properties: VirtualNetworkProperties {
                address_space: AddressSpace {
                    address_prefixes: vec!["10.0.0.0/24".to_string()],
                },
                provisioning_state: None,
            },
            tags: Default::default(),
        }
    }

    #[tokio::test]
    async fn get_missing_vnet_is_not_found() {
        let mock = MockFabricClient::new();
        let err = VirtualNetworkClient::get(&mock, "rg1", "vnet-a")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let mock = MockFabricClient::new();
        let vnet = test_vnet("vnet-a");
        VirtualNetworkClient::create_or_update(&mock, "rg1", "vnet-a", &vnet)
            .await
            .unwrap();

        let fetched = VirtualNetworkClient::get(&mock, "rg1", "vnet-a").await.unwrap();
        assert_eq!(fetched.name, "vnet-a");
        assert_eq!(
            fetched.properties.address_space.address_prefixes,
            vec!["10.0.0.0/24".to_string()]
        );
        assert_eq!(mock.vnet_create_calls(), 1);
    }

    #[tokio::test]
    async fn delete_removes_resource_and_counts() {
        let mock = MockFabricClient::new();
        mock.add_virtual_network("rg1", test_vnet("vnet-a"));

        VirtualNetworkClient::delete(&mock, "rg1", "vnet-a").await.unwrap();
        assert!(mock.virtual_network("rg1", "vnet-a").is_none());
        assert_eq!(mock.vnet_delete_calls(), 1);

        let err = VirtualNetworkClient::delete(&mock, "rg1", "vnet-a")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(mock.vnet_delete_calls(), 2);
    }

    #[tokio::test]
    async fn injected_failure_is_consumed_once() {
        let mock = MockFabricClient::new();
        mock.fail_next_create(FabricError::Api("boom".to_string()));

        let vnet = test_vnet("vnet-a");
        let err = VirtualNetworkClient::create_or_update(&mock, "rg1", "vnet-a", &vnet)
            .await
            .unwrap_err();
        assert!(matches!(err, FabricError::Api(_)));

        // Failure consumed; the retry succeeds
        VirtualNetworkClient::create_or_update(&mock, "rg1", "vnet-a", &vnet)
            .await
            .unwrap();
        assert_eq!(mock.vnet_create_calls(), 2);
    }
}
