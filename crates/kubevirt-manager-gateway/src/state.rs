//! Gateway application state.
//!
//! This module defines the shared state that is available to all request handlers.

use std::sync::Arc;

use kubevirt_manager_control::VmManager;

use crate::config::GatewayConfig;

/// Shared application state for the gateway.
///
/// This struct holds references to all services needed by the HTTP handlers.
pub struct GatewayState<M>
where
    M: VmManager,
{
    /// The lifecycle manager for VM operations.
    pub manager: Arc<M>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl<M> GatewayState<M>
where
    M: VmManager,
{
    /// Create a new gateway state.
    #[must_use]
    pub fn new(manager: Arc<M>, config: GatewayConfig) -> Self {
        Self { manager, config }
    }
}

impl<M> Clone for GatewayState<M>
where
    M: VmManager,
{
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
            config: self.config.clone(),
        }
    }
}
