//! Cloud agent API client
//!
//! Implements the REST client for the fabric cloud agent. Resources live
//! under `/api/groups/{group}/virtualnetworks/{name}` and
//! `/api/groups/{group}/virtualharddisks/{name}`; disks accept an optional
//! `container` query parameter selecting the storage container.

use crate::error::FabricError;
use crate::fabric_trait::{VirtualHardDiskClient, VirtualNetworkClient};
use crate::models::{VirtualHardDisk, VirtualNetwork};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Cloud agent API client
pub struct FabricClient {
    client: Client,
    base_url: String,
    token: String,
}

impl FabricClient {
    /// Create a new cloud agent client
    ///
    /// # Arguments
    /// * `base_url` - Cloud agent base URL (e.g. "https://agent.fabric.local:55000")
    /// * `token` - Bearer token for authentication
    pub fn new(base_url: String, token: String) -> Result<Self, FabricError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(FabricError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Validate the token by making a lightweight authenticated request.
    ///
    /// Probes the agent status endpoint, which requires authentication but
    /// touches no resources. Useful at startup to fail fast on a bad
    /// credential or an unreachable agent.
    pub async fn validate_token(&self) -> Result<(), FabricError> {
        let url = format!("{}/api/status", self.base_url);
        debug!("validating cloud agent token and connectivity");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(FabricError::Http)?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FabricError::Authentication(format!("{} - {}", status, body)));
        }
        if !status.is_success() {
            return Err(FabricError::Api(format!(
                "failed to validate token: {} - {}",
                status, body
            )));
        }

        debug!("token validated successfully");
        Ok(())
    }

    fn vnet_url(&self, group: &str, name: &str) -> String {
        format!("{}/api/groups/{}/virtualnetworks/{}", self.base_url, group, name)
    }

    fn disk_url(&self, group: &str, container: Option<&str>, name: &str) -> String {
        let url = format!(
            "{}/api/groups/{}/virtualharddisks/{}",
            self.base_url, group, name
        );
        match container {
            Some(container) => format!("{}?container={}", url, container),
            None => url,
        }
    }

    async fn get_resource<T>(&self, url: &str, kind: &str, name: &str) -> Result<T, FabricError>
    where
        T: serde::de::DeserializeOwned,
    {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .send()
            .await?;
        self.decode(response, kind, name).await
    }

    async fn put_resource<T, B>(
        &self,
        url: &str,
        body: &B,
        kind: &str,
        name: &str,
    ) -> Result<T, FabricError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize,
    {
        debug!("PUT {}", url);
        let response = self
            .client
            .put(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        self.decode(response, kind, name).await
    }

    async fn delete_resource(&self, url: &str, kind: &str, name: &str) -> Result<(), FabricError> {
        debug!("DELETE {}", url);
        let response = self
            .client
            .delete(url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FabricError::NotFound(format!("{} {} not found", kind, name)));
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(FabricError::Authentication(format!("{} - {}", status, body)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FabricError::Api(format!(
                "failed to delete {} {}: {} - {}",
                kind, name, status, body
            )));
        }
        Ok(())
    }

    async fn decode<T>(&self, response: Response, kind: &str, name: &str) -> Result<T, FabricError>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FabricError::NotFound(format!("{} {} not found", kind, name)));
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(FabricError::Authentication(format!("{} - {}", status, body)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FabricError::Api(format!(
                "{} {} request failed: {} - {}",
                kind, name, status, body
            )));
        }

        // Capture the response body for better error messages on decode failures
        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            FabricError::Api(format!(
                "error decoding response body: {} - Response (first 500 chars): {}",
                e,
                response_text.chars().take(500).collect::<String>()
            ))
        })
    }

    /// Get a virtual network by group and name
    pub async fn get_virtual_network(
        &self,
        group: &str,
        name: &str,
    ) -> Result<VirtualNetwork, FabricError> {
        self.get_resource(&self.vnet_url(group, name), "virtual network", name)
            .await
    }

    /// Create or replace a virtual network
    pub async fn create_or_update_virtual_network(
        &self,
        group: &str,
        name: &str,
        vnet: &VirtualNetwork,
    ) -> Result<VirtualNetwork, FabricError> {
        self.put_resource(&self.vnet_url(group, name), vnet, "virtual network", name)
            .await
    }

    /// Delete a virtual network
    pub async fn delete_virtual_network(&self, group: &str, name: &str) -> Result<(), FabricError> {
        self.delete_resource(&self.vnet_url(group, name), "virtual network", name)
            .await
    }

    /// Get a virtual hard disk by group, optional container, and name
    pub async fn get_virtual_hard_disk(
        &self,
        group: &str,
        container: Option<&str>,
        name: &str,
    ) -> Result<VirtualHardDisk, FabricError> {
        self.get_resource(
            &self.disk_url(group, container, name),
            "virtual hard disk",
            name,
        )
        .await
    }

    /// Create or replace a virtual hard disk
    pub async fn create_or_update_virtual_hard_disk(
        &self,
        group: &str,
        container: Option<&str>,
        name: &str,
        disk: &VirtualHardDisk,
    ) -> Result<VirtualHardDisk, FabricError> {
        self.put_resource(
            &self.disk_url(group, container, name),
            disk,
            "virtual hard disk",
            name,
        )
        .await
    }

    /// Delete a virtual hard disk
    pub async fn delete_virtual_hard_disk(
        &self,
        group: &str,
        container: Option<&str>,
        name: &str,
    ) -> Result<(), FabricError> {
        self.delete_resource(
            &self.disk_url(group, container, name),
            "virtual hard disk",
            name,
        )
        .await
    }
}

#[async_trait::async_trait]
impl VirtualNetworkClient for FabricClient {
    async fn get(&self, group: &str, name: &str) -> Result<VirtualNetwork, FabricError> {
        self.get_virtual_network(group, name).await
    }

    async fn create_or_update(
        &self,
        group: &str,
        name: &str,
        vnet: &VirtualNetwork,
    ) -> Result<VirtualNetwork, FabricError> {
        self.create_or_update_virtual_network(group, name, vnet).await
    }

    async fn delete(&self, group: &str, name: &str) -> Result<(), FabricError> {
        self.delete_virtual_network(group, name).await
    }
}

#[async_trait::async_trait]
impl VirtualHardDiskClient for FabricClient {
    async fn get(
        &self,
        group: &str,
        container: Option<&str>,
        name: &str,
    ) -> Result<VirtualHardDisk, FabricError> {
        self.get_virtual_hard_disk(group, container, name).await
    }

    async fn create_or_update(
        &self,
        group: &str,
        container: Option<&str>,
        name: &str,
        disk: &VirtualHardDisk,
    ) -> Result<VirtualHardDisk, FabricError> {
        self.create_or_update_virtual_hard_disk(group, container, name, disk)
            .await
    }

    async fn delete(
        &self,
        group: &str,
        container: Option<&str>,
        name: &str,
    ) -> Result<(), FabricError> {
        self.delete_virtual_hard_disk(group, container, name).await
    }
}
