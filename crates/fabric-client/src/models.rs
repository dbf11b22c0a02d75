//! Cloud agent API models
//!
//! These models match the resource representations the fabric cloud agent
//! serves for network and storage operations. Field names are camelCase on
//! the wire.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Virtual network resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetwork {
    pub name: String,
    /// Network backing type, e.g. "Transparent"
    #[serde(rename = "type")]
    pub network_type: String,
    pub properties: VirtualNetworkProperties,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

/// Properties of a virtual network
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetworkProperties {
    pub address_space: AddressSpace,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

/// CIDR blocks assigned to a virtual network
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressSpace {
    pub address_prefixes: Vec<String>,
}

/// Virtual hard disk resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualHardDisk {
    pub name: String,
    pub properties: VirtualHardDiskProperties,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

/// Properties of a virtual hard disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualHardDiskProperties {
    /// Image the disk is cloned from, when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}
