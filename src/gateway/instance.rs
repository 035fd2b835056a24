/// Instance data model shared by every gateway implementation.
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Instance type used when `--instance-type` is not given.
pub const DEFAULT_INSTANCE_TYPE: &str = "t2.micro";

/// Parameters for launching new instances from an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub image_id: String,
    pub instance_type: String,
    pub key_name: String,
    pub security_group_id: String,
    pub subnet_id: String,
    /// Number of instances to create. Always at least 1.
    pub count: u16,
}

/// Lifecycle state as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstanceState {
    Pending,
    Running,
    Stopping,
    Stopped,
    ShuttingDown,
    Terminated,
    Unknown,
}

impl InstanceState {
    /// Parse the provider's state name. Unrecognised names map to `Unknown`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "pending" => Self::Pending,
            "running" => Self::Running,
            "stopping" => Self::Stopping,
            "stopped" => Self::Stopped,
            "shutting-down" => Self::ShuttingDown,
            "terminated" => Self::Terminated,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::ShuttingDown => "shutting-down",
            Self::Terminated => "terminated",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A read-only snapshot of one instance from a list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRecord {
    pub instance_id: String,
    pub state: InstanceState,
    pub instance_type: String,
    /// Absent only when the provider omits it.
    pub launch_time: Option<DateTime<Utc>>,
}

/// One instance's state change as reported by a start/stop response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub instance_id: String,
    pub previous: InstanceState,
    pub current: InstanceState,
}

/// Result of a resume or suspend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    /// HTTP status of the successful provider response.
    pub status_code: u16,
    pub instance_ids: Vec<String>,
    pub transitions: Vec<StateTransition>,
}

/// Single-pass listing returned by `list_all`. Call again to refresh.
pub type InstanceListing = std::vec::IntoIter<InstanceRecord>;
