/// Shared serializable output types for all commands.
///
/// These types are what gets written to stdout as text lines, a table, or
/// JSON. They are decoupled from the gateway's `InstanceRecord` /
/// `OperationOutcome` types.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::gateway::{InstanceError, InstanceRecord, InstanceState, OperationOutcome};

/// One instance created by `launch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchedOutput {
    pub instance_id: String,
}

/// Which lifecycle action a transition output reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Resume,
    Suspend,
}

impl Action {
    /// Past-tense verb used in text output.
    #[must_use]
    pub fn verb(self) -> &'static str {
        match self {
            Self::Resume => "started",
            Self::Suspend => "stopped",
        }
    }
}

/// Result of a `resume` or `suspend` for one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutput {
    pub instance_id: String,
    pub action: Action,
    /// HTTP status of the provider response.
    pub status_code: u16,
    /// State before the call, when the provider reported it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_state: Option<InstanceState>,
    /// State right after the call, when the provider reported it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_state: Option<InstanceState>,
}

impl TransitionOutput {
    /// One output line per affected instance in the outcome.
    #[must_use]
    pub fn from_outcome(outcome: &OperationOutcome, action: Action) -> Vec<Self> {
        outcome
            .instance_ids
            .iter()
            .map(|id| {
                let change = outcome.transitions.iter().find(|t| &t.instance_id == id);
                Self {
                    instance_id: id.clone(),
                    action,
                    status_code: outcome.status_code,
                    previous_state: change.map(|t| t.previous),
                    current_state: change.map(|t| t.current),
                }
            })
            .collect()
    }
}

/// One instance in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceOutput {
    pub instance_id: String,
    pub state: InstanceState,
    pub instance_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_time: Option<DateTime<Utc>>,
}

impl From<InstanceRecord> for InstanceOutput {
    fn from(record: InstanceRecord) -> Self {
        Self {
            instance_id: record.instance_id,
            state: record.state,
            instance_type: record.instance_type,
            launch_time: record.launch_time,
        }
    }
}

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable classification (`snake_case`).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorOutput {
    /// Construct from an `InstanceError`.
    #[must_use]
    pub fn from_instance_error(err: &InstanceError) -> Self {
        Self {
            ok: false,
            error: ErrorDetail {
                code: err.code().to_owned(),
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::instance::StateTransition;

    #[test]
    fn test_transition_output_picks_matching_change() {
        let outcome = OperationOutcome {
            status_code: 200,
            instance_ids: vec!["i-0123456789abcdef".to_owned()],
            transitions: vec![StateTransition {
                instance_id: "i-0123456789abcdef".to_owned(),
                previous: InstanceState::Running,
                current: InstanceState::Stopping,
            }],
        };

        let out = TransitionOutput::from_outcome(&outcome, Action::Suspend);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].status_code, 200);
        assert_eq!(out[0].previous_state, Some(InstanceState::Running));
        assert_eq!(out[0].current_state, Some(InstanceState::Stopping));
    }

    #[test]
    fn test_transition_output_without_change() {
        let outcome = OperationOutcome {
            status_code: 200,
            instance_ids: vec!["i-1".to_owned()],
            transitions: vec![],
        };
        let out = TransitionOutput::from_outcome(&outcome, Action::Resume);
        assert_eq!(out[0].current_state, None);
        let json = serde_json::to_value(&out[0]).unwrap();
        assert!(json.get("current_state").is_none());
        assert_eq!(json["action"], "resume");
    }

    #[test]
    fn test_error_output_carries_code() {
        let err = InstanceError::ProviderConnectivity("refused".to_owned());
        let out = ErrorOutput::from_instance_error(&err);
        assert!(!out.ok);
        assert_eq!(out.error.code, "provider_connectivity");
        assert!(out.error.message.contains("refused"));
    }
}
