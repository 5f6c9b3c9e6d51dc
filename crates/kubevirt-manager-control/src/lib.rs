//! VM lifecycle management for kubevirt-manager.
//!
//! This crate holds the business logic between the HTTP gateway and the
//! KubeVirt adapter: listing and translating instances, creating VMs from the
//! configured template, and applying lifecycle actions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Gateway (HTTP)                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      VmManagerService                        │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐   │
//! │  │    List     │ │   Create    │ │   Action (start)    │   │
//! │  │ + Translate │ │  Template   │ │   + conflict retry  │   │
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                   ┌─────────────────────┐
//!                   │     VirtClient      │
//!                   │  (KubeVirt adapter) │
//!                   └─────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use kubevirt_manager_control::{VmManager, VmManagerService};
//! use kubevirt_manager_orchestrator::{ClientConfig, KubeVirtClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(KubeVirtClient::new(&ClientConfig::from_env()).await?);
//! let manager = VmManagerService::with_defaults(client);
//!
//! for vm in manager.list("default").await?.vms {
//!     println!("{} running={} arch={}", vm.name, vm.running, vm.cpu.arch);
//! }
//!
//! manager.action("default", "jevenvm", "start").await?;
//! # Ok(())
//! # }
//! ```
//!
//! See the [`lifecycle`] module for the supported actions.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod lifecycle;
pub mod service;
pub mod translate;
pub mod types;

pub use error::{ControlError, Result};
pub use lifecycle::VmAction;
pub use service::{VmManager, VmManagerService};
pub use translate::{cpu_arch, data_disks, translate, DATA_VOLUME_CLAIM};
pub use types::ControlConfig;

// Re-export commonly used types from dependencies for convenience
pub use kubevirt_manager_core::{Cpu, DiskInfo, Vm, VmList};
pub use kubevirt_manager_orchestrator::{OrchestratorError, VirtualMachine};
