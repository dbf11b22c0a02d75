//! Service error taxonomy

use crate::telemetry::{OperationKind, ResourceKind};
use fabric_client::FabricError;
use thiserror::Error;

/// Errors surfaced by the reconciliation services.
///
/// `NotFound` is an expected condition: reconcile treats it as the create
/// trigger and delete treats it as already done. `Upstream` carries every
/// other remote failure, enriched with the identity of the resource the
/// call targeted. The services never retry; the reconciliation loop that
/// calls them owns retry and backoff.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Resource absent on the fabric
    #[error("{kind} {group}/{name} not found")]
    NotFound {
        kind: ResourceKind,
        group: String,
        name: String,
    },

    /// Remote call failed for a reason other than not-found
    #[error("{operation} failed for {kind} {group}/{name}")]
    Upstream {
        operation: OperationKind,
        kind: ResourceKind,
        group: String,
        name: String,
        #[source]
        source: FabricError,
    },
}

impl ServiceError {
    /// True when the error is the expected not-found condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound { .. })
    }

    pub(crate) fn not_found(kind: ResourceKind, group: &str, name: &str) -> Self {
        ServiceError::NotFound {
            kind,
            group: group.to_string(),
            name: name.to_string(),
        }
    }

    pub(crate) fn upstream(
        operation: OperationKind,
        kind: ResourceKind,
        group: &str,
        name: &str,
        source: FabricError,
    ) -> Self {
        ServiceError::Upstream {
            operation,
            kind,
            group: group.to_string(),
            name: name.to_string(),
            source,
        }
    }
}
