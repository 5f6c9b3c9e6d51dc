//! Types for the orchestrator crate.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Phase of a `VirtualMachineInstance` lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VmiPhase {
    /// Accepted, not yet handed to the scheduler.
    Pending,
    /// Waiting for a node.
    Scheduling,
    /// Placed on a node, domain not yet started.
    Scheduled,
    /// Domain is executing.
    Running,
    /// Domain exited cleanly.
    Succeeded,
    /// Domain exited with an error.
    Failed,
    /// Phase cannot be determined.
    #[default]
    Unknown,
}

impl VmiPhase {
    /// Parse a phase from the KubeVirt status string.
    #[must_use]
    pub fn from_kubevirt_phase(phase: &str) -> Self {
        match phase {
            "Pending" => Self::Pending,
            "Scheduling" => Self::Scheduling,
            "Scheduled" => Self::Scheduled,
            "Running" => Self::Running,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }

    /// The KubeVirt status string for this phase.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Scheduling => "Scheduling",
            Self::Scheduled => "Scheduled",
            Self::Running => "Running",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
        }
    }

    /// Check if the instance has finished executing.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// How to reach the Kubernetes API server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Explicit kubeconfig file. When unset, the in-cluster / `$KUBECONFIG`
    /// inference chain is used.
    pub kubeconfig_path: Option<PathBuf>,
    /// Kubeconfig context to select. Defaults to the current context.
    pub context: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Supported environment variables:
    /// - `KUBECONFIG_PATH`: kubeconfig file to read
    /// - `KUBE_CONTEXT`: context name within that kubeconfig
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            kubeconfig_path: std::env::var_os("KUBECONFIG_PATH").map(PathBuf::from),
            context: std::env::var("KUBE_CONTEXT").ok(),
        }
    }
}

/// The fixed template used to create new virtual machines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmTemplate {
    /// Name of the created `VirtualMachine`.
    pub name: String,
    /// Extra labels. An `app=<name>` label is always added.
    pub labels: BTreeMap<String, String>,
    /// Whether the VM starts immediately after creation.
    pub running: bool,
    /// Requested memory quantity.
    pub memory: String,
    /// Cores per socket.
    pub cores: u32,
    /// Socket count.
    pub sockets: u32,
    /// Threads per core.
    pub threads: u32,
    /// QEMU machine type.
    pub machine_type: String,
    /// Bus for the root and cloud-init disks.
    pub disk_bus: String,
    /// Container image holding the root disk.
    pub container_disk_image: String,
    /// Base64 cloud-init user data.
    pub cloud_init_user_data_base64: String,
    /// Name of the pod network and its masquerade interface.
    pub network_name: String,
}

impl Default for VmTemplate {
    fn default() -> Self {
        Self {
            name: "jevenvm".to_string(),
            labels: BTreeMap::new(),
            running: true,
            memory: "256M".to_string(),
            cores: 2,
            sockets: 1,
            threads: 2,
            machine_type: "q35".to_string(),
            disk_bus: "virtio".to_string(),
            container_disk_image: "quay.io/kubevirt/cirros-container-disk-demo".to_string(),
            cloud_init_user_data_base64: "SGkuXG4=".to_string(),
            network_name: "default".to_string(),
        }
    }
}

impl VmTemplate {
    /// Create a template with the given VM name and default hardware.
    #[must_use]
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Load the template from environment variables.
    ///
    /// Supported environment variables:
    /// - `VM_TEMPLATE_NAME`: name of the created VM
    /// - `VM_TEMPLATE_IMAGE`: container disk image
    /// - `VM_TEMPLATE_MEMORY`: memory quantity (e.g. `512Mi`)
    /// - `VM_TEMPLATE_CORES`, `VM_TEMPLATE_SOCKETS`, `VM_TEMPLATE_THREADS`: CPU topology
    /// - `VM_TEMPLATE_MACHINE_TYPE`: QEMU machine type
    #[must_use]
    pub fn from_env() -> Self {
        let mut template = Self::default();

        if let Ok(val) = std::env::var("VM_TEMPLATE_NAME") {
            template.name = val;
        }
        if let Ok(val) = std::env::var("VM_TEMPLATE_IMAGE") {
            template.container_disk_image = val;
        }
        if let Ok(val) = std::env::var("VM_TEMPLATE_MEMORY") {
            template.memory = val;
        }
        if let Ok(val) = std::env::var("VM_TEMPLATE_CORES") {
            if let Ok(n) = val.parse() {
                template.cores = n;
            }
        }
        if let Ok(val) = std::env::var("VM_TEMPLATE_SOCKETS") {
            if let Ok(n) = val.parse() {
                template.sockets = n;
            }
        }
        if let Ok(val) = std::env::var("VM_TEMPLATE_THREADS") {
            if let Ok(n) = val.parse() {
                template.threads = n;
            }
        }
        if let Ok(val) = std::env::var("VM_TEMPLATE_MACHINE_TYPE") {
            template.machine_type = val;
        }

        template
    }
}
