//! Lifecycle manager service implementation.
//!
//! This module provides the `VmManager` trait and the `VmManagerService`
//! implementation that turns client requests into orchestrator calls.

use std::sync::Arc;

use async_trait::async_trait;
use kube::ResourceExt;
use kubevirt_manager_core::VmList;
use kubevirt_manager_orchestrator::{build_vm, OrchestratorError, VirtClient, VirtualMachine};

use crate::error::{ControlError, Result};
use crate::lifecycle::VmAction;
use crate::translate::translate;
use crate::types::ControlConfig;

/// Operations the gateway exposes over HTTP.
#[async_trait]
pub trait VmManager: Send + Sync {
    /// List the VM instances of a namespace in orchestrator order.
    ///
    /// # Errors
    ///
    /// Any orchestrator failure aborts the listing; no partial list is returned.
    async fn list(&self, namespace: &str) -> Result<VmList>;

    /// Create a `VirtualMachine` from the configured template.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if a VM with the template's name already exists.
    async fn create_vm(&self, namespace: &str) -> Result<VirtualMachine>;

    /// Apply a named action to a VM instance.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::UnsupportedAction` for any name other than
    /// `"start"` without contacting the orchestrator. Returns `NotFound` if
    /// the instance does not exist and `Conflict` once every attempt lost a
    /// concurrent update.
    async fn action(&self, namespace: &str, name: &str, action: &str) -> Result<VmAction>;
}

/// The lifecycle manager backed by a [`VirtClient`].
pub struct VmManagerService<C: VirtClient> {
    client: Arc<C>,
    config: ControlConfig,
}

impl<C: VirtClient> VmManagerService<C> {
    /// Create a new lifecycle manager.
    #[must_use]
    pub fn new(client: Arc<C>, config: ControlConfig) -> Self {
        Self { client, config }
    }

    /// Create with default configuration.
    #[must_use]
    pub fn with_defaults(client: Arc<C>) -> Self {
        Self::new(client, ControlConfig::default())
    }

    /// Get a reference to the orchestrator client.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Read, modify and replace the instance until the write lands or the
    /// attempts run out.
    async fn apply_action(&self, namespace: &str, name: &str, action: VmAction) -> Result<()> {
        let attempts = self.config.max_update_attempts.max(1);
        let mut last_conflict = None;

        for attempt in 1..=attempts {
            let mut instance = self.client.get_instance(namespace, name).await?;
            action.apply(&mut instance);

            match self.client.update_instance(namespace, &instance).await {
                Ok(updated) => {
                    tracing::info!(
                        namespace,
                        name,
                        action = %action,
                        attempt,
                        resource_version = ?updated.resource_version(),
                        "Applied VM action"
                    );
                    return Ok(());
                }
                Err(e @ OrchestratorError::Conflict(_)) => {
                    tracing::warn!(
                        namespace,
                        name,
                        action = %action,
                        attempt,
                        max_attempts = attempts,
                        error = %e,
                        "Version conflict, retrying"
                    );
                    last_conflict = Some(e);
                    if attempt < attempts {
                        tokio::time::sleep(self.config.retry_backoff).await;
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(last_conflict
            .unwrap_or_else(|| {
                OrchestratorError::Conflict(format!("{name}: update attempts exhausted"))
            })
            .into())
    }
}

#[async_trait]
impl<C: VirtClient + 'static> VmManager for VmManagerService<C> {
    async fn list(&self, namespace: &str) -> Result<VmList> {
        let instances = self.client.list_instances(namespace).await?;
        let list: VmList = instances.iter().map(translate).collect();

        tracing::debug!(namespace, count = list.len(), "Listed VMs");

        Ok(list)
    }

    async fn create_vm(&self, namespace: &str) -> Result<VirtualMachine> {
        let vm = build_vm(namespace, &self.config.template);
        let created = self.client.create_vm(namespace, &vm).await?;

        tracing::info!(
            namespace,
            name = %created.name_any(),
            uid = ?created.uid(),
            "Created VM"
        );

        Ok(created)
    }

    async fn action(&self, namespace: &str, name: &str, action: &str) -> Result<VmAction> {
        let action: VmAction = action.parse().inspect_err(|e| {
            tracing::debug!(namespace, name, error = %e, "Rejected VM action");
        })?;

        self.apply_action(namespace, name, action).await?;

        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use kubevirt_manager_orchestrator::{
        MockVirtClient, VirtualMachineInstance, VirtualMachineInstanceSpec, VmiPhase,
    };

    fn setup() -> (VmManagerService<MockVirtClient>, Arc<MockVirtClient>) {
        let client = Arc::new(MockVirtClient::new());
        let config = ControlConfig {
            retry_backoff: Duration::from_millis(1),
            ..Default::default()
        };
        let service = VmManagerService::new(Arc::clone(&client), config);
        (service, client)
    }

    fn phase_of(client: &MockVirtClient, name: &str) -> VmiPhase {
        client.instance("default", name).unwrap().phase()
    }

    #[tokio::test]
    async fn list_translates_in_order() {
        let (service, client) = setup();
        client.add_instance("default", "zeta", VmiPhase::Running);
        client.add_instance("default", "alpha", VmiPhase::Scheduled);
        client.add_instance("other", "hidden", VmiPhase::Running);

        let list = service.list("default").await.unwrap();

        let names: Vec<_> = list.vms.iter().map(|vm| vm.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert!(list.vms[0].running);
        assert!(!list.vms[1].running);
        assert_eq!(list.vms[0].namespace, "default");
    }

    #[tokio::test]
    async fn list_empty_namespace() {
        let (service, _client) = setup();

        let list = service.list("nothing-here").await.unwrap();

        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn list_aborts_when_orchestrator_unavailable() {
        let (service, client) = setup();
        client.add_instance("default", "vm1", VmiPhase::Running);
        client.set_unavailable(true);

        let result = service.list("default").await;

        assert!(matches!(
            result,
            Err(ControlError::Orchestrator(OrchestratorError::Unavailable(_)))
        ));
    }

    #[tokio::test]
    async fn list_applies_translation_rules() {
        let (service, client) = setup();
        let mut spec = VirtualMachineInstanceSpec::default();
        spec.domain.cpu = Some(kubevirt_manager_orchestrator::crd::CpuSpec {
            cores: 4,
            model: "ARMv8".to_string(),
            ..Default::default()
        });
        client.insert_instance("default", VirtualMachineInstance::new("arm-vm", spec));

        let list = service.list("default").await.unwrap();

        assert_eq!(list.vms[0].cpu.arch, "ARM");
        assert_eq!(list.vms[0].cpu.cores, 4);
        assert_eq!(list.vms[0].memory, "0");
    }

    #[tokio::test]
    async fn create_vm_uses_template() {
        let (service, client) = setup();

        let vm = service.create_vm("tenant").await.unwrap();

        assert_eq!(vm.name_any(), "jevenvm");
        assert_eq!(vm.namespace().as_deref(), Some("tenant"));
        assert!(vm.uid().is_some());
        assert_eq!(client.vm_count(), 1);
    }

    #[tokio::test]
    async fn create_vm_twice_conflicts() {
        let (service, client) = setup();
        service.create_vm("default").await.unwrap();

        let result = service.create_vm("default").await;

        assert!(result.as_ref().is_err_and(ControlError::is_conflict));
        assert_eq!(client.vm_count(), 1);
    }

    #[tokio::test]
    async fn start_sets_running() {
        let (service, client) = setup();
        client.add_instance("default", "vm1", VmiPhase::Scheduled);

        let action = service.action("default", "vm1", "start").await.unwrap();

        assert_eq!(action, VmAction::Start);
        assert_eq!(phase_of(&client, "vm1"), VmiPhase::Running);
        assert_eq!(client.update_calls(), 1);
    }

    #[tokio::test]
    async fn start_missing_instance_is_not_found() {
        let (service, client) = setup();

        let result = service.action("default", "missingname", "start").await;

        assert!(matches!(
            result,
            Err(ControlError::Orchestrator(OrchestratorError::NotFound(_)))
        ));
        assert_eq!(client.update_calls(), 0);
    }

    #[tokio::test]
    async fn unsupported_action_does_not_touch_orchestrator() {
        let (service, client) = setup();
        client.add_instance("default", "vm1", VmiPhase::Scheduled);

        for name in ["stop", "", "restart"] {
            let result = service.action("default", "vm1", name).await;
            assert!(matches!(result, Err(ControlError::UnsupportedAction(_))));
        }

        // Rejected before the name is looked up
        let result = service.action("default", "missingname", "stop").await;
        assert!(matches!(result, Err(ControlError::UnsupportedAction(_))));

        assert_eq!(client.update_calls(), 0);
        assert_eq!(phase_of(&client, "vm1"), VmiPhase::Scheduled);
    }

    #[tokio::test]
    async fn start_retries_after_conflict() {
        let (service, client) = setup();
        client.add_instance("default", "vm1", VmiPhase::Pending);
        client.fail_next_updates(2);

        service.action("default", "vm1", "start").await.unwrap();

        assert_eq!(client.update_calls(), 3);
        assert_eq!(phase_of(&client, "vm1"), VmiPhase::Running);
    }

    #[tokio::test]
    async fn start_gives_up_after_max_attempts() {
        let (service, client) = setup();
        client.add_instance("default", "vm1", VmiPhase::Pending);
        client.fail_next_updates(u32::MAX);

        let result = service.action("default", "vm1", "start").await;

        assert!(result.as_ref().is_err_and(ControlError::is_conflict));
        assert_eq!(client.update_calls(), 5);
        assert_eq!(phase_of(&client, "vm1"), VmiPhase::Pending);
    }

    #[tokio::test]
    async fn start_attempts_follow_config() {
        let client = Arc::new(MockVirtClient::new());
        client.add_instance("default", "vm1", VmiPhase::Pending);
        client.fail_next_updates(u32::MAX);
        let service = VmManagerService::new(
            Arc::clone(&client),
            ControlConfig {
                max_update_attempts: 2,
                retry_backoff: Duration::ZERO,
                ..Default::default()
            },
        );

        let result = service.action("default", "vm1", "start").await;

        assert!(result.as_ref().is_err_and(ControlError::is_conflict));
        assert_eq!(client.update_calls(), 2);
    }

    #[tokio::test]
    async fn start_does_not_retry_other_errors() {
        let (service, client) = setup();
        client.add_instance("default", "vm1", VmiPhase::Pending);
        client.set_unavailable(true);

        let result = service.action("default", "vm1", "start").await;

        assert!(matches!(
            result,
            Err(ControlError::Orchestrator(OrchestratorError::Unavailable(_)))
        ));
        assert_eq!(client.update_calls(), 0);
    }
}
