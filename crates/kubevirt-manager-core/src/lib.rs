//! Client-facing model types for kubevirt-manager.
//!
//! This crate holds the compact VM representation exposed to API clients.
//! It does not depend on the KubeVirt schema; the control crate
//! projects `VirtualMachineInstance` objects onto these types.
//!
//! - **[`Vm`]**: one virtual machine instance
//! - **[`Cpu`]**: CPU topology and inferred architecture
//! - **[`DiskInfo`]**: a persisted data volume attached to the VM
//! - **[`VmList`]**: the list payload returned by the inventory endpoint
//!
//! # Example
//!
//! ```
//! use kubevirt_manager_core::{Cpu, Vm, VmList};
//!
//! let vm = Vm {
//!     name: "demo".to_string(),
//!     namespace: "default".to_string(),
//!     cpu: Cpu {
//!         cores: 2,
//!         ..Cpu::default()
//!     },
//!     ..Vm::default()
//! };
//!
//! let list = VmList::from(vec![vm]);
//! assert_eq!(list.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod model;

pub use model::{Cpu, DiskInfo, Vm, VmList, DEFAULT_NAMESPACE};
