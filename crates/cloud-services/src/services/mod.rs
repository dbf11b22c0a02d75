//! Reconciliation services, one per cloud resource kind
//!
//! Every service follows the same contract:
//! - `get` re-fetches current remote state; an absent resource surfaces as
//!   [`ServiceError::NotFound`] rather than being swallowed.
//! - `reconcile` creates the resource when absent and otherwise leaves it
//!   alone. Resources are immutable after creation, so there is no update
//!   path and repeated calls mutate at most once.
//! - `delete` removes the resource only when this controller's ownership
//!   tag is present, and treats an already-absent resource as success.

pub mod disks;
pub mod virtualnetworks;
#[cfg(test)]
mod disks_test;

use crate::error::ServiceError;
use std::collections::BTreeMap;

/// Default key of the tag marking which controller created a resource
pub const DEFAULT_OWNER_TAG_KEY: &str = "owner";

/// Uniform Get/Reconcile/Delete contract shared by all resource services
#[async_trait::async_trait]
pub trait ResourceService {
    /// Desired-state descriptor for this resource kind
    type Spec: Send + Sync;
    /// Remote resource representation returned by the cloud agent
    type Resource: Send + Sync;

    async fn get(&self, spec: &Self::Spec) -> Result<Self::Resource, ServiceError>;
    async fn reconcile(&self, spec: &Self::Spec) -> Result<(), ServiceError>;
    async fn delete(&self, spec: &Self::Spec) -> Result<(), ServiceError>;
}

/// Tag pair recording which controller created a resource.
///
/// Deletion rights are gated on this tag: a service only deletes resources
/// whose tag set maps the key to this exact value. Untagged resources and
/// resources tagged by another controller are never touched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnershipTag {
    key: String,
    value: String,
}

impl OwnershipTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Tag with the default "owner" key and the controller name as value
    pub fn for_controller(controller: impl Into<String>) -> Self {
        Self::new(DEFAULT_OWNER_TAG_KEY, controller)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Stamp the tag onto a resource's tag set
    pub fn apply(&self, tags: &mut BTreeMap<String, String>) {
        tags.insert(self.key.clone(), self.value.clone());
    }

    /// Whether a tag set marks the resource as created by this controller.
    ///
    /// A missing tag means the resource predates this controller or belongs
    /// to someone else; both read as not owned.
    pub fn owns(&self, tags: &BTreeMap<String, String>) -> bool {
        tags.get(&self.key) == Some(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_requires_exact_key_and_value() {
        let owner = OwnershipTag::for_controller("fabric-provider");
        let mut tags = BTreeMap::new();

        assert!(!owner.owns(&tags));

        tags.insert("owner".to_string(), "someone-else".to_string());
        assert!(!owner.owns(&tags));

        tags.insert("owner".to_string(), "fabric-provider".to_string());
        assert!(owner.owns(&tags));
    }

    #[test]
    fn apply_overwrites_foreign_value() {
        let owner = OwnershipTag::new("owner", "fabric-provider");
        let mut tags = BTreeMap::new();
        tags.insert("owner".to_string(), "someone-else".to_string());

        owner.apply(&mut tags);
        assert_eq!(tags.get("owner").map(String::as_str), Some("fabric-provider"));
    }
}
