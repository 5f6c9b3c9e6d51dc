//! HTTP gateway for kubevirt-manager.
//!
//! This crate provides the public-facing API for listing, creating and
//! starting KubeVirt virtual machines. It handles:
//!
//! - REST HTTP endpoints for VM management
//! - Namespace defaulting for every request
//! - Mapping of lifecycle errors onto HTTP responses
//! - CORS, body-size limits, request timeouts and request tracing
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Clients (HTTP)                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   kubevirt-manager-gateway                   │
//! │        ┌─────────────────┐     ┌─────────────────┐          │
//! │        │     Router      │     │    ApiError     │          │
//! │        │   + Handlers    │     │    mapping      │          │
//! │        └─────────────────┘     └─────────────────┘          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                   ┌─────────────────────┐
//!                   │  VmManager (control)│
//!                   └─────────────────────┘
//!                              │
//!                              ▼
//!                   ┌─────────────────────┐
//!                   │   Kubernetes API    │
//!                   └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use kubevirt_manager_gateway::{create_router, GatewayConfig, GatewayState};
//! use kubevirt_manager_control::VmManagerService;
//! use kubevirt_manager_orchestrator::{ClientConfig, KubeVirtClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(KubeVirtClient::new(&ClientConfig::default()).await?);
//! let manager = Arc::new(VmManagerService::with_defaults(client));
//!
//! let config = GatewayConfig::default();
//! let listen_addr = config.listen_addr.clone();
//! let app = create_router(GatewayState::new(manager, config));
//!
//! let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::GatewayConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::GatewayState;
