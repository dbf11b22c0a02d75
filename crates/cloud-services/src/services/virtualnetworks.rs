//! Virtual network reconciliation service

use super::{OwnershipTag, ResourceService};
use crate::error::ServiceError;
use crate::scope::Scope;
use crate::telemetry::{self, OperationKind, OperationRecord, ResourceKind, TelemetrySink};
use fabric_client::VirtualNetworkClient;
use fabric_client::models::{AddressSpace, VirtualNetwork, VirtualNetworkProperties};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Backing type requested for every network the provider creates
const NETWORK_TYPE: &str = "Transparent";

/// Desired state of one virtual network.
///
/// Networks carry their own group because a cluster's networks may live in
/// a different resource group than the owning custom resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VirtualNetworkSpec {
    pub name: String,
    pub group: String,
    pub cidr: String,
}

/// Drives one virtual network on the fabric toward a [`VirtualNetworkSpec`].
///
/// Networks are immutable once created: reconcile creates the network when
/// absent and is otherwise a no-op, so repeated calls issue at most one
/// mutation against the cloud agent.
pub struct VirtualNetworkService {
    scope: Arc<Scope>,
    client: Arc<dyn VirtualNetworkClient>,
    telemetry: Arc<dyn TelemetrySink>,
    owner: OwnershipTag,
}

impl VirtualNetworkService {
    pub fn new(
        scope: Arc<Scope>,
        client: Arc<dyn VirtualNetworkClient>,
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

    fn desired_network(&self, spec: &VirtualNetworkSpec) -> VirtualNetwork {
        let mut tags = BTreeMap::new();
        self.owner.apply(&mut tags);
        VirtualNetwork {
            name: spec.name.clone(),
            network_type: NETWORK_TYPE.to_string(),
            properties: VirtualNetworkProperties {
                address_space: AddressSpace {
                    address_prefixes: vec![spec.cidr.clone()],
                },
                provisioning_state: None,
            },
            tags,
        }
    }

    fn record(
        &self,
        operation: OperationKind,
        spec: &VirtualNetworkSpec,
        body: Option<serde_json::Value>,
        error: Option<String>,
    ) {
        self.telemetry.write(&OperationRecord::new(
            operation,
            ResourceKind::VirtualNetwork,
            telemetry::scoped_resource_name(&spec.group, &spec.name),
            body,
            error,
        ));
    }
}

#[async_trait::async_trait]
impl ResourceService for VirtualNetworkService {
    type Spec = VirtualNetworkSpec;
    type Resource = VirtualNetwork;

    async fn get(&self, spec: &VirtualNetworkSpec) -> Result<VirtualNetwork, ServiceError> {
        let result = self.client.get(&spec.group, &spec.name).await;
        self.record(
            OperationKind::Get,
            spec,
            None,
            result.as_ref().err().map(ToString::to_string),
        );
        match result {
            Ok(vnet) => Ok(vnet),
            Err(err) if err.is_not_found() => Err(ServiceError::not_found(
                ResourceKind::VirtualNetwork,
                &spec.group,
                &spec.name,
            )),
            Err(err) => Err(ServiceError::upstream(
                OperationKind::Get,
                ResourceKind::VirtualNetwork,
                &spec.group,
                &spec.name,
                err,
            )),
        }
    }

    async fn reconcile(&self, spec: &VirtualNetworkSpec) -> Result<(), ServiceError> {
        telemetry::log_scope_context(&self.scope);

        match self.get(spec).await {
            Ok(_) => {
                // already exists and networks are immutable, nothing to update
                info!(vnet = %spec.name, group = %spec.group, "found virtual network in resource group");
                return Ok(());
            }
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }

        let desired = self.desired_network(spec);
        info!(vnet = %spec.name, group = %spec.group, "creating virtual network in resource group");
        let result = self
            .client
            .create_or_update(&spec.group, &spec.name, &desired)
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
                ResourceKind::VirtualNetwork,
                &spec.group,
                &spec.name,
                err,
            )
        })?;

        info!(vnet = %spec.name, group = %spec.group, "successfully created virtual network in resource group");
        Ok(())
    }

    async fn delete(&self, spec: &VirtualNetworkSpec) -> Result<(), ServiceError> {
        telemetry::log_scope_context(&self.scope);

        let vnet = match self.get(spec).await {
            Ok(vnet) => vnet,
            // already absent
            Err(err) if err.is_not_found() => return Ok(()),
            Err(err) => return Err(err),
        };

        if !self.owner.owns(&vnet.tags) {
            // not created by this controller, leave it alone
            info!(vnet = %spec.name, group = %spec.group, "skipping deletion of virtual network not owned by this controller");
            return Ok(());
        }

        info!(vnet = %spec.name, group = %spec.group, "deleting virtual network in resource group");
        let result = self.client.delete(&spec.group, &spec.name).await;
        self.record(
            OperationKind::Delete,
            spec,
            None,
            result.as_ref().err().map(ToString::to_string),
        );
        match result {
            Ok(()) => {
                info!(vnet = %spec.name, group = %spec.group, "successfully deleted virtual network in resource group");
                Ok(())
            }
            // raced with a concurrent deletion
            Err(err) if err.is_not_found() => Ok(()),
            Err(err) => Err(ServiceError::upstream(
                OperationKind::Delete,
                ResourceKind::VirtualNetwork,
                &spec.group,
                &spec.name,
                err,
            )),
        }
    }
}
