use serde::{Serialize, Serializer};
use std::fmt;

/// Lifecycle state reported by the backend. Free text on the wire; anything
/// unrecognised is kept verbatim in `Other`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstanceState {
    Running,
    Stopped,
    Terminated,
    Other(String),
}

impl InstanceState {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "running" => InstanceState::Running,
            "stopped" => InstanceState::Stopped,
            "terminated" => InstanceState::Terminated,
            _ => InstanceState::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            InstanceState::Running => "running",
            InstanceState::Stopped => "stopped",
            InstanceState::Terminated => "terminated",
            InstanceState::Other(raw) => raw,
        }
    }

    /// Badge flavour used by the stylesheet (`badge-running`, ..., `badge-other`).
    pub fn badge_class(&self) -> &'static str {
        match self {
            InstanceState::Running => "badge-running",
            InstanceState::Stopped => "badge-stopped",
            InstanceState::Terminated => "badge-terminated",
            InstanceState::Other(_) => "badge-other",
        }
    }

    pub fn label(&self) -> String {
        crate::utils::format_state(self.as_str())
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for InstanceState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
