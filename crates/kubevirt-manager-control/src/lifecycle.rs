//! VM lifecycle actions.
//!
//! Actions are requested by name and parsed into [`VmAction`] before the
//! orchestrator is contacted, so an unknown name never causes a mutation.
//!
//! # State Machine
//!
//! ```text
//!     ┌──────────────────────────────────────────┐
//!     │  Pending | Scheduling | Scheduled |      │
//!     │  Running | Succeeded | Failed | Unknown  │
//!     └────────────────────┬─────────────────────┘
//!                          │ (start)
//!                          ▼
//!                    ┌───────────┐
//!                    │  Running  │
//!                    └───────────┘
//! ```
//!
//! `start` is accepted from every phase. No other transition is exposed.

use std::fmt;
use std::str::FromStr;

use kubevirt_manager_orchestrator::{VirtualMachineInstance, VmiPhase};
use serde::Serialize;

use crate::error::ControlError;

/// An action that can be applied to a VM instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VmAction {
    /// Mark the instance as running.
    Start,
}

impl VmAction {
    /// Wire name of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
        }
    }

    /// Phase the instance is moved to.
    #[must_use]
    pub const fn target_phase(self) -> VmiPhase {
        match self {
            Self::Start => VmiPhase::Running,
        }
    }

    /// Apply the action to a fetched instance.
    pub fn apply(self, instance: &mut VirtualMachineInstance) {
        instance.set_phase(self.target_phase());
    }
}

impl FromStr for VmAction {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            other => Err(ControlError::UnsupportedAction(other.to_string())),
        }
    }
}

impl fmt::Display for VmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubevirt_manager_orchestrator::VirtualMachineInstanceSpec;

    #[test]
    fn parse_start() {
        assert_eq!("start".parse::<VmAction>().unwrap(), VmAction::Start);
        assert_eq!(VmAction::Start.as_str(), "start");
        assert_eq!(VmAction::Start.to_string(), "start");
    }

    #[test]
    fn parse_rejects_everything_else() {
        for name in ["stop", "", "Start", "START", " start", "restart", "pause"] {
            match name.parse::<VmAction>() {
                Err(ControlError::UnsupportedAction(got)) => assert_eq!(got, name),
                other => panic!("expected UnsupportedAction for {name:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn start_targets_running_from_any_phase() {
        for phase in [
            VmiPhase::Pending,
            VmiPhase::Scheduling,
            VmiPhase::Scheduled,
            VmiPhase::Running,
            VmiPhase::Succeeded,
            VmiPhase::Failed,
            VmiPhase::Unknown,
        ] {
            let mut vmi = VirtualMachineInstance::new("vm", VirtualMachineInstanceSpec::default());
            vmi.set_phase(phase);

            VmAction::Start.apply(&mut vmi);

            assert_eq!(vmi.phase(), VmiPhase::Running);
        }
    }

    #[test]
    fn serializes_as_wire_name() {
        assert_eq!(
            serde_json::to_string(&VmAction::Start).unwrap(),
            "\"start\""
        );
    }
}
