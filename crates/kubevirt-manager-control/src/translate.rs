//! Projection of KubeVirt instances onto the client-facing model.
//!
//! Everything here is pure: one `VirtualMachineInstance` in, one [`Vm`] out.
//! Missing optional fields degrade to zero values instead of failing.

use chrono::Local;
use kube::ResourceExt;

use kubevirt_manager_core::{Cpu, DiskInfo, Vm};
use kubevirt_manager_orchestrator::crd::Volume;
use kubevirt_manager_orchestrator::VirtualMachineInstance;

/// Claim name that marks a PVC-backed volume as persisted data storage.
pub const DATA_VOLUME_CLAIM: &str = "kubevirt.io/volume-data";

/// Memory string reported when an instance requests no memory.
const ZERO_QUANTITY: &str = "0";

/// Translate one instance into its client-facing representation.
#[must_use]
pub fn translate(vmi: &VirtualMachineInstance) -> Vm {
    let domain = &vmi.spec.domain;
    let cpu = domain.cpu.clone().unwrap_or_default();

    Vm {
        name: vmi.name_any(),
        namespace: vmi.namespace().unwrap_or_default(),
        uid: vmi.uid().unwrap_or_default(),
        creation_timestamp: vmi
            .creation_timestamp()
            .map(|t| t.0.with_timezone(&Local)),
        running: vmi.is_running(),
        memory: domain
            .resources
            .requests
            .get("memory")
            .map_or_else(|| ZERO_QUANTITY.to_string(), |q| q.0.clone()),
        cpu: Cpu {
            cores: cpu.cores,
            sockets: cpu.sockets,
            threads: cpu.threads,
            arch: cpu_arch(&cpu.model),
            model: cpu.model,
        },
        disks: data_disks(&vmi.spec.volumes),
    }
}

/// Infer the CPU architecture from a model string.
///
/// Case-sensitive prefix match, first match wins. Unrecognised models are
/// returned unchanged.
#[must_use]
pub fn cpu_arch(model: &str) -> String {
    if model.starts_with("Intel") || model.starts_with("x86") {
        "x86".to_string()
    } else if model.starts_with("ARM") {
        "ARM".to_string()
    } else {
        model.to_string()
    }
}

/// Select the volumes backed by the data PVC claim, in attachment order.
#[must_use]
pub fn data_disks(volumes: &[Volume]) -> Vec<DiskInfo> {
    volumes
        .iter()
        .filter(|v| {
            v.persistent_volume_claim
                .as_ref()
                .is_some_and(|pvc| pvc.claim_name == DATA_VOLUME_CLAIM)
        })
        .map(|v| DiskInfo::new(v.name.clone()))
        .collect()
}
