//! KubeVirt API client.
//!
//! This module provides the [`VirtClient`] trait, the only boundary through
//! which kubevirt-manager talks to the cluster, and the [`KubeVirtClient`]
//! implementation backed by `kube::Client`.

use async_trait::async_trait;
use kube::api::{Api, ListParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config, ResourceExt};
use tracing::{debug, info};

use crate::crd::{VirtualMachine, VirtualMachineInstance};
use crate::types::ClientConfig;
use crate::{OrchestratorError, Result};

/// Namespaced access to KubeVirt `VirtualMachine` and
/// `VirtualMachineInstance` resources.
///
/// Every call is a live round-trip. Implementations hold no state besides
/// their connection.
#[async_trait]
pub trait VirtClient: Send + Sync {
    /// List the VM instances in a namespace, in API server order.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` or `Forbidden` on transport or auth failure.
    async fn list_instances(&self, namespace: &str) -> Result<Vec<VirtualMachineInstance>>;

    /// Fetch a single VM instance.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no instance of that name exists.
    async fn get_instance(&self, namespace: &str, name: &str) -> Result<VirtualMachineInstance>;

    /// Create a `VirtualMachine`.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the name is taken, `InvalidSpec` if the object is rejected.
    async fn create_vm(&self, namespace: &str, vm: &VirtualMachine) -> Result<VirtualMachine>;

    /// Replace a VM instance. The object's `resourceVersion` is sent as a
    /// precondition.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the instance changed since it was read.
    async fn update_instance(
        &self,
        namespace: &str,
        instance: &VirtualMachineInstance,
    ) -> Result<VirtualMachineInstance>;
}

/// [`VirtClient`] backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeVirtClient {
    client: Client,
}

impl KubeVirtClient {
    /// Connect using the given configuration.
    ///
    /// With a kubeconfig path the file is read and the selected (or current)
    /// context is used. Otherwise the in-cluster / `$KUBECONFIG` inference
    /// chain applies.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the kubeconfig cannot be read or resolved.
    pub async fn new(config: &ClientConfig) -> Result<Self> {
        let kube_config = match &config.kubeconfig_path {
            Some(path) => {
                let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                    OrchestratorError::Config(format!(
                        "failed to read kubeconfig {}: {e}",
                        path.display()
                    ))
                })?;
                let options = KubeConfigOptions {
                    context: config.context.clone(),
                    ..Default::default()
                };
                Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| OrchestratorError::Config(e.to_string()))?
            }
            None => Config::infer()
                .await
                .map_err(|e| OrchestratorError::Config(e.to_string()))?,
        };

        info!(cluster_url = %kube_config.cluster_url, "Resolved Kubernetes API endpoint");

        let client = Client::try_from(kube_config)
            .map_err(|e| OrchestratorError::Config(format!("failed to build client: {e}")))?;

        Ok(Self { client })
    }

    /// Wrap a pre-configured client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn instances_api(&self, namespace: &str) -> Api<VirtualMachineInstance> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn vms_api(&self, namespace: &str) -> Api<VirtualMachine> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl VirtClient for KubeVirtClient {
    async fn list_instances(&self, namespace: &str) -> Result<Vec<VirtualMachineInstance>> {
        let list = self
            .instances_api(namespace)
            .list(&ListParams::default())
            .await?;

        debug!(namespace, count = list.items.len(), "Listed VM instances");

        Ok(list.items)
    }

    async fn get_instance(&self, namespace: &str, name: &str) -> Result<VirtualMachineInstance> {
        Ok(self.instances_api(namespace).get(name).await?)
    }

    async fn create_vm(&self, namespace: &str, vm: &VirtualMachine) -> Result<VirtualMachine> {
        let created = self
            .vms_api(namespace)
            .create(&PostParams::default(), vm)
            .await?;

        info!(
            namespace,
            name = %created.name_any(),
            uid = ?created.uid(),
            "Created VirtualMachine"
        );

        Ok(created)
    }

    async fn update_instance(
        &self,
        namespace: &str,
        instance: &VirtualMachineInstance,
    ) -> Result<VirtualMachineInstance> {
        let name = instance.name_any();
        let updated = self
            .instances_api(namespace)
            .replace(&name, &PostParams::default(), instance)
            .await?;

        debug!(
            namespace,
            name,
            resource_version = ?updated.resource_version(),
            "Replaced VM instance"
        );

        Ok(updated)
    }
}

/// An in-memory client for testing without a real cluster.
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;

    use crate::crd::VirtualMachineInstanceSpec;
    use crate::types::VmiPhase;

    /// A mock client that keeps objects in insertion order and enforces
    /// `resourceVersion` preconditions on update.
    #[derive(Default)]
    pub struct MockVirtClient {
        state: Mutex<MockState>,
    }

    #[derive(Default)]
    struct MockState {
        instances: Vec<(String, VirtualMachineInstance)>,
        vms: Vec<(String, VirtualMachine)>,
        next_version: u64,
        pending_conflicts: u32,
        unavailable: bool,
        update_calls: u32,
    }

    impl MockState {
        fn bump_version(&mut self) -> String {
            self.next_version += 1;
            self.next_version.to_string()
        }

        fn check_available(&self) -> Result<()> {
            if self.unavailable {
                return Err(OrchestratorError::Unavailable(
                    "connection refused".to_string(),
                ));
            }
            Ok(())
        }
    }

    impl MockVirtClient {
        /// Create a new empty mock client.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Store an instance as-is, assigning it a fresh `resourceVersion`.
        pub fn insert_instance(&self, namespace: &str, mut instance: VirtualMachineInstance) {
            let mut state = self.state.lock();
            instance.metadata.namespace = Some(namespace.to_string());
            instance.metadata.resource_version = Some(state.bump_version());
            state.instances.push((namespace.to_string(), instance));
        }

        /// Store a minimal instance with the given name and phase.
        pub fn add_instance(&self, namespace: &str, name: &str, phase: VmiPhase) {
            let mut instance =
                VirtualMachineInstance::new(name, VirtualMachineInstanceSpec::default());
            instance.set_phase(phase);
            self.insert_instance(namespace, instance);
        }

        /// Make the next `count` updates fail with `Conflict`, as if another
        /// writer got in first.
        pub fn fail_next_updates(&self, count: u32) {
            self.state.lock().pending_conflicts = count;
        }

        /// Make every call fail with `Unavailable`.
        pub fn set_unavailable(&self, unavailable: bool) {
            self.state.lock().unavailable = unavailable;
        }

        /// Number of `update_instance` calls received.
        #[must_use]
        pub fn update_calls(&self) -> u32 {
            self.state.lock().update_calls
        }

        /// Get a stored instance.
        #[must_use]
        pub fn instance(&self, namespace: &str, name: &str) -> Option<VirtualMachineInstance> {
            self.state
                .lock()
                .instances
                .iter()
                .find(|(ns, i)| ns == namespace && i.name_any() == name)
                .map(|(_, i)| i.clone())
        }

        /// Number of stored `VirtualMachine` objects.
        #[must_use]
        pub fn vm_count(&self) -> usize {
            self.state.lock().vms.len()
        }
    }

    #[async_trait]
    impl VirtClient for MockVirtClient {
        async fn list_instances(&self, namespace: &str) -> Result<Vec<VirtualMachineInstance>> {
            let state = self.state.lock();
            state.check_available()?;
            Ok(state
                .instances
                .iter()
                .filter(|(ns, _)| ns == namespace)
                .map(|(_, i)| i.clone())
                .collect())
        }

        async fn get_instance(
            &self,
            namespace: &str,
            name: &str,
        ) -> Result<VirtualMachineInstance> {
            let state = self.state.lock();
            state.check_available()?;
            state
                .instances
                .iter()
                .find(|(ns, i)| ns == namespace && i.name_any() == name)
                .map(|(_, i)| i.clone())
                .ok_or_else(|| {
                    OrchestratorError::NotFound(format!(
                        "virtualmachineinstances \"{name}\" not found"
                    ))
                })
        }

        async fn create_vm(&self, namespace: &str, vm: &VirtualMachine) -> Result<VirtualMachine> {
            let mut state = self.state.lock();
            state.check_available()?;

            let name = vm.name_any();
            if state
                .vms
                .iter()
                .any(|(ns, v)| ns == namespace && v.name_any() == name)
            {
                return Err(OrchestratorError::Conflict(format!(
                    "virtualmachines \"{name}\" already exists"
                )));
            }

            let mut created = vm.clone();
            created.metadata.namespace = Some(namespace.to_string());
            created.metadata.uid = Some(format!("mock-uid-{}", state.next_version + 1));
            created.metadata.resource_version = Some(state.bump_version());
            state.vms.push((namespace.to_string(), created.clone()));

            Ok(created)
        }

        async fn update_instance(
            &self,
            namespace: &str,
            instance: &VirtualMachineInstance,
        ) -> Result<VirtualMachineInstance> {
            let mut state = self.state.lock();
            state.check_available()?;
            state.update_calls += 1;

            let name = instance.name_any();

            if state.pending_conflicts > 0 {
                state.pending_conflicts -= 1;
                // Simulate a concurrent writer bumping the stored version.
                let version = state.bump_version();
                if let Some((_, stored)) = state
                    .instances
                    .iter_mut()
                    .find(|(ns, i)| ns == namespace && i.name_any() == name)
                {
                    stored.metadata.resource_version = Some(version);
                }
            }

            let version = state.bump_version();
            let (_, stored) = state
                .instances
                .iter_mut()
                .find(|(ns, i)| ns == namespace && i.name_any() == name)
                .ok_or_else(|| {
                    OrchestratorError::NotFound(format!(
                        "virtualmachineinstances \"{name}\" not found"
                    ))
                })?;

            if stored.metadata.resource_version != instance.metadata.resource_version {
                return Err(OrchestratorError::Conflict(format!(
                    "Operation cannot be fulfilled on virtualmachineinstances \"{name}\": \
                     the object has been modified; please apply your changes to the latest version and try again"
                )));
            }

            let mut updated = instance.clone();
            updated.metadata.resource_version = Some(version);
            *stored = updated.clone();

            Ok(updated)
        }
    }
}
