//! Virtual hard disk reconciliation service

use super::{OwnershipTag, ResourceService};
use crate::error::ServiceError;
use crate::scope::Scope;
use crate::telemetry::{self, OperationKind, OperationRecord, ResourceKind, TelemetrySink};
use fabric_client::VirtualHardDiskClient;
use fabric_client::models::{VirtualHardDisk, VirtualHardDiskProperties};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Desired state of one virtual hard disk.
///
/// Disks live in the scope's resource group. `source` optionally names the
/// image the disk is cloned from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiskSpec {
    pub name: String,
    pub source: Option<String>,
}

/// Drives one virtual hard disk on the fabric toward a [`DiskSpec`].
///
/// Disks are immutable once created, so reconcile is create-if-absent and
/// repeated calls issue at most one mutation against the cloud agent.
pub struct DiskService {
    scope: Arc<Scope>,
    client: Arc<dyn VirtualHardDiskClient>,
    telemetry: Arc<dyn TelemetrySink>,
    owner: OwnershipTag,
}

impl DiskService {
    pub fn new(
        scope: Arc<Scope>,
        client: Arc<dyn VirtualHardDiskClient>,
        telemetry: Arc<dyn TelemetrySink>,
        owner: OwnershipTag,
    ) -> Self {
        Self {
            scope,
            client,
            telemetry,
            owner,
        }
    }

    fn group(&self) -> &str {
        self.scope.resource_group()
    }

    fn desired_disk(&self, spec: &DiskSpec) -> VirtualHardDisk {
        let mut tags = BTreeMap::new();
        self.owner.apply(&mut tags);
        VirtualHardDisk {
            name: spec.name.clone(),
            properties: VirtualHardDiskProperties {
                source: spec.source.clone(),
                provisioning_state: None,
            },
            tags,
        }
    }

    fn record(
        &self,
        operation: OperationKind,
        spec: &DiskSpec,
        body: Option<serde_json::Value>,
        error: Option<String>,
    ) {
        self.telemetry.write(&OperationRecord::new(
            operation,
            ResourceKind::VirtualHardDisk,
            telemetry::scoped_resource_name(self.group(), &spec.name),
            body,
            error,
        ));
    }
}

#[async_trait::async_trait]
impl ResourceService for DiskService {
    type Spec = DiskSpec;
    type Resource = VirtualHardDisk;

    async fn get(&self, spec: &DiskSpec) -> Result<VirtualHardDisk, ServiceError> {
        let result = self.client.get(self.group(), None, &spec.name).await;
        self.record(
            OperationKind::Get,
            spec,
            None,
            result.as_ref().err().map(ToString::to_string),
        );
        match result {
            Ok(disk) => Ok(disk),
            Err(err) if err.is_not_found() => Err(ServiceError::not_found(
                ResourceKind::VirtualHardDisk,
                self.group(),
                &spec.name,
            )),
            Err(err) => Err(ServiceError::upstream(
                OperationKind::Get,
                ResourceKind::VirtualHardDisk,
                self.group(),
                &spec.name,
                err,
            )),
        }
    }

    async fn reconcile(&self, spec: &DiskSpec) -> Result<(), ServiceError> {
        telemetry::log_scope_context(&self.scope);

        match self.get(spec).await {
            Ok(_) => {
                // already exists and disks are immutable, nothing to update
                info!(disk = %spec.name, "found disk in resource group");
                return Ok(());
            }
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }

        let desired = self.desired_disk(spec);
        info!(disk = %spec.name, "creating disk");
        let result = self
            .client
            .create_or_update(self.group(), None, &spec.name, &desired)
            .await;
        self.record(
            OperationKind::CreateOrUpdate,
            spec,
            serde_json::to_value(&desired).ok(),
            result.as_ref().err().map(ToString::to_string),
        );
        result.map_err(|err| {
            ServiceError::upstream(
                OperationKind::CreateOrUpdate,
                ResourceKind::VirtualHardDisk,
                self.group(),
                &spec.name,
                err,
            )
        })?;

        info!(disk = %spec.name, "successfully created disk");
        Ok(())
    }

    async fn delete(&self, spec: &DiskSpec) -> Result<(), ServiceError> {
        telemetry::log_scope_context(&self.scope);

        let disk = match self.get(spec).await {
            Ok(disk) => disk,
            // already absent
            Err(err) if err.is_not_found() => return Ok(()),
            Err(err) => return Err(err),
        };

        if !self.owner.owns(&disk.tags) {
            // not created by this controller, leave it alone
            info!(disk = %spec.name, "skipping deletion of disk not owned by this controller");
            return Ok(());
        }

        info!(disk = %spec.name, "deleting disk");
        let result = self.client.delete(self.group(), None, &spec.name).await;
        self.record(
            OperationKind::Delete,
            spec,
            None,
            result.as_ref().err().map(ToString::to_string),
        );
        match result {
            Ok(()) => {
                info!(disk = %spec.name, "successfully deleted disk");
                Ok(())
            }
            // raced with a concurrent deletion
            Err(err) if err.is_not_found() => Ok(()),
            Err(err) => Err(ServiceError::upstream(
                OperationKind::Delete,
                ResourceKind::VirtualHardDisk,
                self.group(),
                &spec.name,
                err,
            )),
        }
    }
}
