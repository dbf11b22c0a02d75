//! Test utilities for unit testing services
//!
//! Helpers for wiring services to the mock cloud agent client and for
//! building remote resources in known ownership states.

use crate::scope::{Authorizer, Scope};
use crate::services::OwnershipTag;
use crate::services::disks::DiskService;
use crate::services::virtualnetworks::VirtualNetworkService;
use crate::telemetry::{LogSink, OperationRecord, TelemetrySink};
use fabric_client::MockFabricClient;
use fabric_client::models::{
    AddressSpace, VirtualHardDisk, VirtualHardDiskProperties, VirtualNetwork,
    VirtualNetworkProperties,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Controller name the tests reconcile under
pub const TEST_CONTROLLER: &str = "fabric-provider";

/// Resource group of the test scope
pub const TEST_GROUP: &str = "rg1";

/// Scope shared by all service tests
pub fn test_scope() -> Arc<Scope> {
    Arc::new(Scope::new(
        TEST_GROUP,
        "agent.fabric.local",
        Authorizer::from_token("test-token"),
        "FabricCluster/test",
    ))
}

/// Ownership tag of the controller under test
pub fn test_owner() -> OwnershipTag {
    OwnershipTag::for_controller(TEST_CONTROLLER)
}

/// Virtual network service wired to a mock client
pub fn vnet_service(mock: &MockFabricClient) -> VirtualNetworkService {
    VirtualNetworkService::new(
        test_scope(),
        Arc::new(mock.clone()),
        Arc::new(LogSink),
        test_owner(),
    )
}

/// Virtual network service with a caller-supplied telemetry sink
pub fn vnet_service_with_sink(
    mock: &MockFabricClient,
    sink: Arc<dyn TelemetrySink>,
) -> VirtualNetworkService {
    VirtualNetworkService::new(test_scope(), Arc::new(mock.clone()), sink, test_owner())
}

/// Disk service wired to a mock client
pub fn disk_service(mock: &MockFabricClient) -> DiskService {
    DiskService::new(
        test_scope(),
        Arc::new(mock.clone()),
        Arc::new(LogSink),
        test_owner(),
    )
}

fn tag_map(tags: &[(&str, &str)]) -> BTreeMap<String, String> {
    tags.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Remote virtual network in a given ownership state
pub fn existing_vnet(name: &str, tags: &[(&str, &str)]) -> VirtualNetwork {
    VirtualNetwork {
        name: name.to_string(),
        network_type: "Transparent".to_string(),
        properties: VirtualNetworkProperties {
            address_space: AddressSpace {
                address_prefixes: vec!["10.0.0.0/24".to_string()],
            },
            provisioning_state: Some("Succeeded".to_string()),
        },
        tags: tag_map(tags),
    }
}

/// Remote virtual hard disk in a given ownership state
pub fn existing_disk(name: &str, tags: &[(&str, &str)]) -> VirtualHardDisk {
    VirtualHardDisk {
        name: name.to_string(),
        properties: VirtualHardDiskProperties {
            source: None,
            provisioning_state: Some("Succeeded".to_string()),
        },
        tags: tag_map(tags),
    }
}

/// Sink capturing every record for assertions
#[derive(Default)]
pub struct RecordingSink {
    records: Mutex<Vec<OperationRecord>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn records(&self) -> Vec<OperationRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl TelemetrySink for RecordingSink {
    fn write(&self, record: &OperationRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}
