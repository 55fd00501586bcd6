use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::models::{InstanceRecord, Sample};

/// Date each history entry by position: entry `i` of `n` belongs to
/// `today - (n - 1 - i)` days, at midnight UTC. The last entry is today.
pub fn cpu_history_samples(history: &[f64], today: NaiveDate) -> Vec<Sample> {
    let n = history.len();
    history
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let date = today - Duration::days((n - 1 - i) as i64);
            Sample::new(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)), value)
        })
        .collect()
}

/// Samples for the detail view of one instance; empty without history.
pub fn samples_for_record(record: &InstanceRecord, today: NaiveDate) -> Vec<Sample> {
    record
        .cpu_history
        .as_deref()
        .map(|h| cpu_history_samples(h, today))
        .unwrap_or_default()
}
