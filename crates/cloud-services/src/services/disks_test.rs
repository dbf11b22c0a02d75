//! Unit tests for the virtual hard disk service

#[cfg(test)]
mod tests {
    use crate::error::ServiceError;
    use crate::services::ResourceService;
    use crate::services::disks::DiskSpec;
    use crate::telemetry::OperationKind;
    use crate::test_utils::*;
    use fabric_client::{FabricError, MockFabricClient};

    fn spec(name: &str) -> DiskSpec {
        DiskSpec {
            name: name.to_string(),
            source: None,
        }
    }

    #[tokio::test]
    async fn reconcile_of_existing_disk_makes_no_mutating_calls() {
        let mock = MockFabricClient::new();
        mock.add_virtual_hard_disk(TEST_GROUP, existing_disk("disk-a", &[]));
        let service = disk_service(&mock);

        service.reconcile(&spec("disk-a")).await.unwrap();

        assert_eq!(mock.disk_create_calls(), 0);
    }

    #[tokio::test]
    async fn reconcile_creates_missing_disk_with_source_and_owner_tag() {
        let mock = MockFabricClient::new();
        let service = disk_service(&mock);

        service
            .reconcile(&DiskSpec {
                name: "disk-a".to_string(),
                source: Some("ubuntu-22.04.vhdx".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(mock.disk_create_calls(), 1);
        let created = mock.virtual_hard_disk(TEST_GROUP, "disk-a").unwrap();
        assert_eq!(
            created.properties.source.as_deref(),
            Some("ubuntu-22.04.vhdx")
        );
        assert_eq!(
            created.tags.get("owner").map(String::as_str),
            Some(TEST_CONTROLLER)
        );
    }

    #[tokio::test]
    async fn reconcile_is_idempotent() {
        let mock = MockFabricClient::new();
        let service = disk_service(&mock);

        service.reconcile(&spec("disk-a")).await.unwrap();
        service.reconcile(&spec("disk-a")).await.unwrap();

        assert_eq!(mock.disk_create_calls(), 1);
    }

    #[tokio::test]
    async fn reconcile_propagates_create_failure_with_identity() {
        let mock = MockFabricClient::new();
        mock.fail_next_create(FabricError::Api("storage pool full".to_string()));
        let service = disk_service(&mock);

        let err = service.reconcile(&spec("disk-a")).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Upstream {
                operation: OperationKind::CreateOrUpdate,
                ..
            }
        ));
        assert!(err.to_string().contains("rg1/disk-a"));
    }

    #[tokio::test]
    async fn delete_of_absent_disk_succeeds() {
        let mock = MockFabricClient::new();
        let service = disk_service(&mock);

        service.delete(&spec("disk-a")).await.unwrap();

        assert_eq!(mock.disk_delete_calls(), 0);
    }

    #[tokio::test]
    async fn delete_skips_disk_not_owned_by_controller() {
        let mock = MockFabricClient::new();
        mock.add_virtual_hard_disk(
            TEST_GROUP,
            existing_disk("disk-b", &[("owner", "another-controller")]),
        );
        let service = disk_service(&mock);

        service.delete(&spec("disk-b")).await.unwrap();

        assert_eq!(mock.disk_delete_calls(), 0);
        assert!(mock.virtual_hard_disk(TEST_GROUP, "disk-b").is_some());
    }

    #[tokio::test]
    async fn delete_removes_owned_disk_exactly_once() {
        let mock = MockFabricClient::new();
        mock.add_virtual_hard_disk(
            TEST_GROUP,
            existing_disk("disk-a", &[("owner", TEST_CONTROLLER)]),
        );
        let service = disk_service(&mock);

        service.delete(&spec("disk-a")).await.unwrap();
        assert!(mock.virtual_hard_disk(TEST_GROUP, "disk-a").is_none());

        service.delete(&spec("disk-a")).await.unwrap();

        assert_eq!(mock.disk_delete_calls(), 1);
    }

    #[tokio::test]
    async fn delete_tolerates_concurrent_deletion() {
        let mock = MockFabricClient::new();
        mock.add_virtual_hard_disk(
            TEST_GROUP,
            existing_disk("disk-a", &[("owner", TEST_CONTROLLER)]),
        );
        mock.fail_next_delete(FabricError::NotFound("already gone".to_string()));
        let service = disk_service(&mock);

        service.delete(&spec("disk-a")).await.unwrap();

        assert_eq!(mock.disk_delete_calls(), 1);
    }
}
