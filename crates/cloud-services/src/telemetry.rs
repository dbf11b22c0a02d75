//! Operation telemetry for cloud service calls
//!
//! Services report the outcome of every remote call as an
//! [`OperationRecord`]. Sinks are fire-and-forget: the trait is synchronous
//! and infallible, so a slow or broken sink can never gate reconciliation
//! control flow.

use crate::scope::Scope;
use serde::Serialize;
use std::fmt;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Remote operation issued by a service
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum OperationKind {
    Get,
    CreateOrUpdate,
    Delete,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Get => write!(f, "get"),
            OperationKind::CreateOrUpdate => write!(f, "createOrUpdate"),
            OperationKind::Delete => write!(f, "delete"),
        }
    }
}

/// Resource kind a service manages
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ResourceKind {
    VirtualNetwork,
    VirtualHardDisk,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::VirtualNetwork => write!(f, "virtual network"),
            ResourceKind::VirtualHardDisk => write!(f, "virtual hard disk"),
        }
    }
}

/// One record per remote call outcome
#[derive(Clone, Debug, Serialize)]
pub struct OperationRecord {
    pub correlation_id: Uuid,
    pub operation: OperationKind,
    pub resource_kind: ResourceKind,
    /// "{group}/{name}" identity of the resource the call targeted
    pub resource_name: String,
    /// Serialized request body, present on mutating calls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationRecord {
    pub fn new(
        operation: OperationKind,
        resource_kind: ResourceKind,
        resource_name: String,
        body: Option<serde_json::Value>,
        error: Option<String>,
    ) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            operation,
            resource_kind,
            resource_name,
            body,
            error,
        }
    }

    /// Whether the recorded call completed without error
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Receives operation records; never awaited, never allowed to fail
pub trait TelemetrySink: Send + Sync {
    fn write(&self, record: &OperationRecord);
}

/// Sink that emits records as structured tracing events
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn write(&self, record: &OperationRecord) {
        match &record.error {
            None => info!(
                correlation_id = %record.correlation_id,
                operation = %record.operation,
                resource_kind = %record.resource_kind,
                resource = %record.resource_name,
                "cloud operation succeeded"
            ),
            Some(err) => error!(
                correlation_id = %record.correlation_id,
                operation = %record.operation,
                resource_kind = %record.resource_kind,
                resource = %record.resource_name,
                error = %err,
                "cloud operation failed"
            ),
        }
    }
}

/// Scoped "{group}/{name}" identity used in records and error context
pub fn scoped_resource_name(group: &str, name: &str) -> String {
    format!("{}/{}", group, name)
}

/// Log the scope a service operates under, once per operation
pub fn log_scope_context(scope: &Scope) {
    debug!(
        cloud_agent = %scope.cloud_agent_fqdn(),
        resource_group = %scope.resource_group(),
        custom_resource = %scope.custom_resource_name(),
        "cloud operation context"
    );
}
