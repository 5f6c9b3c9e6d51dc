//! KubeVirt API adapter for kubevirt-manager.
//!
//! This crate is the only part of kubevirt-manager that performs network I/O
//! against the cluster. It provides:
//!
//! - Typed `VirtualMachine` / `VirtualMachineInstance` custom resources
//! - The [`VirtClient`] trait and its [`KubeVirtClient`] implementation
//! - The creation template ([`VmTemplate`]) and its `VirtualMachine` builder
//! - Mapping of Kubernetes API failures onto [`OrchestratorError`]
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Lifecycle Manager (control)                   │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        KubeVirtClient                            │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────┐ ┌───────────┐  │
//! │  │    List     │ │    Get      │ │   Create    │ │  Replace  │  │
//! │  │  instances  │ │  instance   │ │     VM      │ │  instance │  │
//! │  └─────────────┘ └─────────────┘ └─────────────┘ └───────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │              Kubernetes API Server (kubevirt.io/v1)              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use kubevirt_manager_orchestrator::{build_vm, ClientConfig, KubeVirtClient, VirtClient, VmTemplate};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = KubeVirtClient::new(&ClientConfig::default()).await?;
//!
//! for vmi in client.list_instances("default").await? {
//!     println!("{:?} running={}", vmi.metadata.name, vmi.is_running());
//! }
//!
//! let vm = build_vm("default", &VmTemplate::default());
//! client.create_vm("default", &vm).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Testing
//!
//! Enable the `test-utils` feature to get [`MockVirtClient`], an in-memory
//! client that enforces `resourceVersion` preconditions:
//!
//! ```ignore
//! use kubevirt_manager_orchestrator::{MockVirtClient, VirtClient, VmiPhase};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MockVirtClient::new();
//! client.add_instance("default", "vm1", VmiPhase::Running);
//!
//! assert_eq!(client.list_instances("default").await?.len(), 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod crd;
pub mod error;
pub mod template;
pub mod types;

pub use client::{KubeVirtClient, VirtClient};
pub use crd::{
    VirtualMachine, VirtualMachineInstance, VirtualMachineInstanceSpec, VirtualMachineSpec,
};
pub use error::{OrchestratorError, Result};
pub use template::build_vm;
pub use types::{ClientConfig, VmTemplate, VmiPhase};

#[cfg(any(test, feature = "test-utils"))]
pub use client::mock::MockVirtClient;
