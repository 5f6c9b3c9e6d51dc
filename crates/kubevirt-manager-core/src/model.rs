//! VM model types exposed to API clients.
//!
//! Every value here is built fresh per read and never written back to the
//! cluster.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Namespace used when a caller does not name one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// CPU topology of a virtual machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cpu {
    /// Number of cores per socket.
    pub cores: u32,
    /// Number of sockets.
    pub sockets: u32,
    /// Number of threads per core.
    pub threads: u32,
    /// CPU model as reported by the cluster. May be empty.
    pub model: String,
    /// Architecture inferred from `model`.
    pub arch: String,
}

/// A persisted data volume attached to a virtual machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskInfo {
    /// Volume name.
    pub name: String,
}

impl DiskInfo {
    /// Create a disk entry with the given volume name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A virtual machine instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vm {
    /// Instance name.
    pub name: String,
    /// Namespace the instance lives in.
    pub namespace: String,
    /// Cluster-assigned unique identifier.
    pub uid: String,
    /// Creation time in the local timezone.
    pub creation_timestamp: Option<DateTime<Local>>,
    /// Whether the instance is currently executing.
    pub running: bool,
    /// Requested memory as a quantity string (e.g. `256M`).
    pub memory: String,
    /// CPU topology.
    pub cpu: Cpu,
    /// Persisted data volumes.
    pub disks: Vec<DiskInfo>,
}

/// Ordered list of virtual machines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmList {
    /// The virtual machines, in cluster list order.
    pub vms: Vec<Vm>,
}

impl VmList {
    /// Number of virtual machines in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vms.len()
    }

    /// Check if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vms.is_empty()
    }
}

impl From<Vec<Vm>> for VmList {
    fn from(vms: Vec<Vm>) -> Self {
        Self { vms }
    }
}

impl FromIterator<Vm> for VmList {
    fn from_iter<I: IntoIterator<Item = Vm>>(iter: I) -> Self {
        Self {
            vms: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_vm() -> Vm {
        Vm {
            name: "demo".to_string(),
            namespace: "default".to_string(),
            uid: "1234-abcd".to_string(),
            creation_timestamp: Some(
                Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
                    .unwrap()
                    .with_timezone(&Local),
            ),
            running: true,
            memory: "256M".to_string(),
            cpu: Cpu {
                cores: 2,
                sockets: 1,
                threads: 2,
                model: "Intel(R) Xeon".to_string(),
                arch: "x86".to_string(),
            },
            disks: vec![DiskInfo::new("data")],
        }
    }

    #[test]
    fn vm_serializes_camel_case() {
        let json = serde_json::to_value(sample_vm()).unwrap();

        assert_eq!(json["name"], "demo");
        assert_eq!(json["uid"], "1234-abcd");
        assert!(json.get("creationTimestamp").is_some());
        assert!(json.get("creation_timestamp").is_none());
        assert_eq!(json["running"], true);
        assert_eq!(json["cpu"]["arch"], "x86");
        assert_eq!(json["disks"][0]["name"], "data");
    }

    #[test]
    fn vm_list_empty_serializes_as_array() {
        let json = serde_json::to_string(&VmList::default()).unwrap();
        assert_eq!(json, r#"{"vms":[]}"#);
    }

    #[test]
    fn vm_list_keeps_order() {
        let mut second = sample_vm();
        second.name = "second".to_string();

        let list: VmList = vec![sample_vm(), second].into_iter().collect();

        assert_eq!(list.len(), 2);
        assert_eq!(list.vms[0].name, "demo");
        assert_eq!(list.vms[1].name, "second");
    }

    #[test]
    fn vm_json_roundtrip_preserves_instant() {
        let vm = sample_vm();
        let json = serde_json::to_string(&vm).unwrap();
        let parsed: Vm = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.creation_timestamp, vm.creation_timestamp);
    }
}
