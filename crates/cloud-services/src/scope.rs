//! Caller-supplied context for reconciliation services
//!
//! The hosting controller builds one [`Scope`] per owning custom resource
//! and shares it read-only across every service it constructs. Services
//! never mutate the scope; they read the resource group and emit its
//! identity fields into logs and telemetry.

use std::fmt;

/// Credential used to authorize calls against the cloud agent.
#[derive(Clone)]
pub struct Authorizer {
    token: String,
}

impl Authorizer {
    /// Wrap a bearer token obtained from the fabric's identity service
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Bearer token for the cloud agent
    pub fn token(&self) -> &str {
        &self.token
    }
}

// Keeps the credential out of debug logs
impl fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorizer")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Capabilities a reconciliation service reads from its caller.
///
/// Long-lived and shared: wrap in an `Arc` and hand a handle to each
/// service at construction.
#[derive(Clone, Debug)]
pub struct Scope {
    resource_group: String,
    cloud_agent_fqdn: String,
    authorizer: Authorizer,
    custom_resource_name: String,
}

impl Scope {
    pub fn new(
        resource_group: impl Into<String>,
        cloud_agent_fqdn: impl Into<String>,
        authorizer: Authorizer,
        custom_resource_name: impl Into<String>,
    ) -> Self {
        Self {
            resource_group: resource_group.into(),
            cloud_agent_fqdn: cloud_agent_fqdn.into(),
            authorizer,
            custom_resource_name: custom_resource_name.into(),
        }
    }

    /// Resource group the owning custom resource manages resources in
    pub fn resource_group(&self) -> &str {
        &self.resource_group
    }

    /// FQDN of the cloud agent serving this scope
    pub fn cloud_agent_fqdn(&self) -> &str {
        &self.cloud_agent_fqdn
    }

    /// Credential for the cloud agent
    pub fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }

    /// Display name of the owning custom resource, e.g. "FabricCluster/demo"
    pub fn custom_resource_name(&self) -> &str {
        &self.custom_resource_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_token() {
        let scope = Scope::new(
            "rg1",
            "agent.fabric.local",
            Authorizer::from_token("secret-token"),
            "FabricCluster/test",
        );
        let rendered = format!("{:?}", scope);
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }
}
