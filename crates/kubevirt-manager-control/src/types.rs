//! Configuration for the lifecycle manager.

use std::time::Duration;

use kubevirt_manager_orchestrator::VmTemplate;

/// Configuration for the lifecycle manager.
#[derive(Debug, Clone)]
pub struct ControlConfig {
    /// Template used by `create_vm`.
    pub template: VmTemplate,
    /// Upper bound on read-modify-write attempts for an action.
    pub max_update_attempts: u32,
    /// Pause between attempts after a version conflict.
    pub retry_backoff: Duration,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            template: VmTemplate::default(),
            max_update_attempts: 5,
            retry_backoff: Duration::from_millis(10),
        }
    }
}

impl ControlConfig {
    /// Load configuration from environment variables.
    ///
    /// Only the creation template is read from the environment; see
    /// [`VmTemplate::from_env`].
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            template: VmTemplate::from_env(),
            ..Self::default()
        }
    }
}
