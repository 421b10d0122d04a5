//! Provisioning lifecycle — a state machine decoupled from any specific
//! orchestration backend.
//!
//! Resources without a backing controller still report a well-defined
//! status (they start `Provisioned`), and health-check-style monitoring
//! can be layered on later without a schema change: `Unknown` is
//! reachable from every live state and reversible once backend contact
//! is restored.

use serde::{Deserialize, Serialize};

use super::id::ResourceId;
use super::scope::ResourceKind;

/// Provisioning status of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvisioningStatus {
    Unknown,
    Provisioning,
    Provisioned,
    Deprovisioning,
    Error,
}

impl ProvisioningStatus {
    /// Initial status on creation: `Provisioning` when a controller
    /// will drive the resource, `Provisioned` otherwise.
    pub fn initial(kind: &ResourceKind) -> Self {
        if kind.orchestrated {
            Self::Provisioning
        } else {
            Self::Provisioned
        }
    }

    /// Whether `self -> to` is a legal edge of the state machine.
    ///
    /// Edges: `provisioning -> provisioned | error`,
    /// `provisioned -> deprovisioning`, `error -> provisioning` (retry),
    /// `deprovisioning -> error` (failed teardown), any live state
    /// `-> unknown` (backend unreachable), and
    /// `unknown -> provisioning | provisioned` (contact restored).
    pub fn can_transition_to(self, to: Self) -> bool {
        use ProvisioningStatus::*;
        matches!(
            (self, to),
            (Provisioning, Provisioned)
                | (Provisioning, Error)
                | (Provisioned, Deprovisioning)
                | (Error, Provisioning)
                | (Deprovisioning, Error)
                | (Provisioning, Unknown)
                | (Provisioned, Unknown)
                | (Deprovisioning, Unknown)
                | (Error, Unknown)
                | (Unknown, Provisioning)
                | (Unknown, Provisioned)
        )
    }
}

/// Asynchronous signal emitted by the orchestration backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrchestrationEvent {
    Provisioned,
    Failed,
    TornDown,
}

/// A lifecycle signal addressed to a single resource by id (never by
/// name — the name may have changed since the signal was emitted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationSignal {
    pub resource_id: ResourceId,
    pub event: OrchestrationEvent,
}

/// Map an orchestration event onto the current status.
///
/// `None` means the event has no legal edge from `current`; the caller
/// decides policy for dropped signals. `TornDown` is not mapped here:
/// it requests physical removal, not a status change.
pub fn next_status(
    current: ProvisioningStatus,
    event: OrchestrationEvent,
) -> Option<ProvisioningStatus> {
    use ProvisioningStatus::*;
    match (current, event) {
        (Provisioning, OrchestrationEvent::Provisioned) => Some(Provisioned),
        (Provisioning, OrchestrationEvent::Failed) => Some(Error),
        (Deprovisioning, OrchestrationEvent::Failed) => Some(Error),
        (Unknown, OrchestrationEvent::Provisioned) => Some(Provisioned),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProvisioningStatus::*;

    const ALL: [ProvisioningStatus; 5] = [Unknown, Provisioning, Provisioned, Deprovisioning, Error];

    #[test]
    fn orchestrated_kinds_start_provisioning() {
        let cluster = ResourceKind::project_scoped("cluster", true);
        let registry = ResourceKind::organization_scoped("registry", false);
        assert_eq!(ProvisioningStatus::initial(&cluster), Provisioning);
        assert_eq!(ProvisioningStatus::initial(&registry), Provisioned);
    }

    #[test]
    fn unknown_is_reachable_from_every_live_state() {
        for state in [Provisioning, Provisioned, Deprovisioning, Error] {
            assert!(state.can_transition_to(Unknown), "{state:?} -> unknown");
        }
    }

    #[test]
    fn unknown_recovers_to_operational_states_only() {
        assert!(Unknown.can_transition_to(Provisioning));
        assert!(Unknown.can_transition_to(Provisioned));
        assert!(!Unknown.can_transition_to(Deprovisioning));
        assert!(!Unknown.can_transition_to(Error));
    }

    #[test]
    fn no_edge_skips_provisioned_on_the_way_down() {
        assert!(!Provisioning.can_transition_to(Deprovisioning));
        assert!(!Error.can_transition_to(Deprovisioning));
    }

    #[test]
    fn provisioned_accepts_no_failure_signal() {
        // A late `failed` after successful provisioning has no edge;
        // the service drops and logs it.
        assert_eq!(next_status(Provisioned, OrchestrationEvent::Failed), None);
    }

    #[test]
    fn events_map_onto_listed_edges_only() {
        assert_eq!(
            next_status(Provisioning, OrchestrationEvent::Provisioned),
            Some(Provisioned)
        );
        assert_eq!(
            next_status(Provisioning, OrchestrationEvent::Failed),
            Some(Error)
        );
        assert_eq!(
            next_status(Deprovisioning, OrchestrationEvent::Failed),
            Some(Error)
        );
        // Torn-down is a removal request, never a status change.
        for state in ALL {
            assert_eq!(next_status(state, OrchestrationEvent::TornDown), None);
        }
    }

    #[test]
    fn serializes_lowercase_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&Deprovisioning).unwrap(),
            "\"deprovisioning\""
        );
        assert_eq!(
            serde_json::to_string(&OrchestrationEvent::TornDown).unwrap(),
            "\"torn-down\""
        );
    }
}
