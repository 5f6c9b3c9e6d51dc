//! `VirtualMachine` builder for the creation template.
//!
//! Turns a [`VmTemplate`] into a complete KubeVirt `VirtualMachine` object:
//! - Memory request and CPU topology
//! - A container-disk root volume and a cloud-init `NoCloud` volume
//! - A masquerade interface on the pod network

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::api::ObjectMeta;

use crate::crd::{
    CloudInitNoCloudSource, ContainerDiskSource, CpuSpec, Devices, Disk, DiskTarget, DomainSpec,
    Interface, InterfaceMasquerade, Machine, Network, PodNetwork, ResourceRequirements,
    VirtualMachine, VirtualMachineInstanceSpec, VirtualMachineInstanceTemplateSpec,
    VirtualMachineSpec, Volume,
};
use crate::VmTemplate;

/// Volume and disk name of the root container disk.
pub const CONTAINER_DISK_NAME: &str = "containerdisk";

/// Volume and disk name of the cloud-init payload.
pub const CLOUD_INIT_DISK_NAME: &str = "cloudinitdisk";

/// Build the `VirtualMachine` described by `template` in `namespace`.
#[must_use]
pub fn build_vm(namespace: &str, template: &VmTemplate) -> VirtualMachine {
    let spec = VirtualMachineSpec {
        running: Some(template.running),
        template: VirtualMachineInstanceTemplateSpec {
            metadata: Some(ObjectMeta {
                labels: Some(build_labels(template)),
                ..Default::default()
            }),
            spec: Some(build_instance_spec(template)),
        },
    };

    let mut vm = VirtualMachine::new(&template.name, spec);
    vm.metadata = build_metadata(namespace, template);
    vm
}

fn build_labels(template: &VmTemplate) -> BTreeMap<String, String> {
    let mut labels = template.labels.clone();
    labels.insert("app".to_string(), template.name.clone());
    labels
}

fn build_metadata(namespace: &str, template: &VmTemplate) -> ObjectMeta {
    ObjectMeta {
        name: Some(template.name.clone()),
        namespace: Some(namespace.to_string()),
        labels: Some(build_labels(template)),
        ..Default::default()
    }
}

fn build_instance_spec(template: &VmTemplate) -> VirtualMachineInstanceSpec {
    VirtualMachineInstanceSpec {
        domain: DomainSpec {
            cpu: Some(CpuSpec {
                cores: template.cores,
                sockets: template.sockets,
                threads: template.threads,
                model: String::new(),
            }),
            resources: build_resources(template),
            machine: Some(Machine {
                type_: template.machine_type.clone(),
            }),
            devices: build_devices(template),
        },
        volumes: build_volumes(template),
        networks: vec![Network {
            name: template.network_name.clone(),
            pod: Some(PodNetwork::default()),
        }],
    }
}

fn build_resources(template: &VmTemplate) -> ResourceRequirements {
    let mut requests = BTreeMap::new();
    requests.insert("memory".to_string(), Quantity(template.memory.clone()));

    ResourceRequirements {
        requests,
        ..Default::default()
    }
}

fn build_devices(template: &VmTemplate) -> Devices {
    let disk = |name: &str| Disk {
        name: name.to_string(),
        disk: Some(DiskTarget {
            bus: template.disk_bus.clone(),
        }),
    };

    Devices {
        disks: vec![disk(CONTAINER_DISK_NAME), disk(CLOUD_INIT_DISK_NAME)],
        interfaces: vec![Interface {
            name: template.network_name.clone(),
            masquerade: Some(InterfaceMasquerade {}),
        }],
    }
}

fn build_volumes(template: &VmTemplate) -> Vec<Volume> {
    vec![
        Volume {
            name: CONTAINER_DISK_NAME.to_string(),
            container_disk: Some(ContainerDiskSource {
                image: template.container_disk_image.clone(),
            }),
            ..Default::default()
        },
        Volume {
            name: CLOUD_INIT_DISK_NAME.to_string(),
            cloud_init_no_cloud: Some(CloudInitNoCloudSource {
                user_data_base64: Some(template.cloud_init_user_data_base64.clone()),
                user_data: None,
            }),
            ..Default::default()
        },
    ]
}
