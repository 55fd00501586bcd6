use chrono::{DateTime, Utc};
use serde::Serialize;

/// One dated CPU reading, derived from a record's history. Never on the wire
/// from the backend.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }

    pub fn is_valid(&self) -> bool {
        self.value.is_finite()
    }
}
