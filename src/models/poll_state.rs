use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::models::InstanceRecord;

/// A successfully fetched inventory. Replaced wholesale on every successful poll.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Inventory {
    pub records: Vec<InstanceRecord>,
    pub fetched_at: DateTime<Utc>,
}

impl Inventory {
    pub fn find(&self, id: &str) -> Option<&InstanceRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}

/// Observable state of the polling controller. Published as one value so a
/// reader never sees records from one poll next to the timestamp of another.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PollState {
    #[default]
    Idle,
    Loading {
        attempt: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        last_good: Option<Arc<Inventory>>,
    },
    Success(Arc<Inventory>),
    Failed {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        last_good: Option<Arc<Inventory>>,
    },
}

impl PollState {
    pub fn is_loading(&self) -> bool {
        matches!(self, PollState::Loading { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            PollState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// The most recent successful inventory, including one kept across a
    /// later failure or a poll that is still running.
    pub fn inventory(&self) -> Option<&Arc<Inventory>> {
        match self {
            PollState::Success(inv) => Some(inv),
            PollState::Loading { last_good, .. } | PollState::Failed { last_good, .. } => last_good.as_ref(),
            PollState::Idle => None,
        }
    }

    pub fn records(&self) -> &[InstanceRecord] {
        self.inventory().map(|inv| inv.records.as_slice()).unwrap_or(&[])
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.inventory().map(|inv| inv.fetched_at)
    }

    pub fn status_name(&self) -> &'static str {
        match self {
            PollState::Idle => "idle",
            PollState::Loading { .. } => "loading",
            PollState::Success(_) => "success",
            PollState::Failed { .. } => "failed",
        }
    }
}
