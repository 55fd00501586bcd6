//! Polling controller: fetch-with-retry against the metrics endpoint.
//!
//! The controller owns a single `PollState` cell (a `watch` channel) and moves
//! it through `Idle → Loading → Success | Failed`, again on every poll. Polls
//! are serialized by an async gate, so a manual refresh waits for an in-flight
//! auto-refresh instead of racing it. Each poll draws a sequence number once it
//! holds the gate, and a commit from a poll older than the last committed one
//! is dropped.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::{parse_inventory, FetchError, Fetcher};
use crate::models::{FieldMapping, Inventory, InstanceRecord, PollState};
use crate::services::backoff::Backoff;

pub struct PollingController {
    fetcher: Arc<dyn Fetcher>,
    mapping: FieldMapping,
    backoff: Backoff,
    state_tx: watch::Sender<PollState>,
    /// Held for the whole retry loop of one poll.
    gate: Mutex<()>,
    started: AtomicU64,
    committed: AtomicU64,
}

impl PollingController {
    pub fn new(fetcher: Arc<dyn Fetcher>, mapping: FieldMapping) -> Self {
        let (state_tx, _) = watch::channel(PollState::Idle);
        Self {
            fetcher,
            mapping,
            backoff: Backoff::default(),
            state_tx,
            gate: Mutex::new(()),
            started: AtomicU64::new(0),
            committed: AtomicU64::new(0),
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn endpoint(&self) -> &str {
        self.fetcher.endpoint()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> PollState {
        self.state_tx.borrow().clone()
    }

    /// Receiver that is notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state_tx.subscribe()
    }

    /// Run up to `max_attempts` fetch attempts (at least one), sleeping
    /// `2^i` seconds after the failed attempt `i` unless it was the last one.
    /// Returns the state this poll committed. If the returned future is
    /// dropped early the poll still settles, as `Failed` with the last good
    /// inventory.
    pub async fn poll(&self, max_attempts: u32) -> PollState {
        let max_attempts = max_attempts.max(1);
        let _gate = self.gate.lock().await;
        let seq = self.started.fetch_add(1, Ordering::AcqRel) + 1;

        let mut pending = PendingPoll {
            controller: self,
            seq,
            last_good: self.state().inventory().cloned(),
            settled: false,
        };
        for attempt in 0..max_attempts {
            self.commit(
                seq,
                PollState::Loading {
                    attempt: attempt + 1,
                    last_good: pending.last_good.clone(),
                },
            );

            match self.attempt().await {
                Ok(records) => {
                    info!(seq, attempt = attempt + 1, count = records.len(), "inventory fetched");
                    return pending.settle(PollState::Success(Arc::new(Inventory {
                        records,
                        fetched_at: Utc::now(),
                    })));
                }
                Err(e) => {
                    warn!(
                        seq,
                        attempt = attempt + 1,
                        max_attempts,
                        kind = e.kind(),
                        error = %e,
                        endpoint = self.endpoint(),
                        "fetch attempt failed"
                    );
                    if attempt + 1 < max_attempts {
                        let delay = self.backoff.delay(attempt);
                        debug!(seq, ?delay, "backing off before next attempt");
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        let message = format!("Failed to reach the backend at {}.", self.endpoint());
        let last_good = pending.last_good.clone();
        pending.settle(PollState::Failed { message, last_good })
    }

    async fn attempt(&self) -> Result<Vec<InstanceRecord>, FetchError> {
        let payload = self.fetcher.fetch().await?;
        parse_inventory(&payload, &self.mapping)
    }

    // Publishes `next` unless a newer poll already committed.
    fn commit(&self, seq: u64, next: PollState) -> bool {
        self.state_tx.send_if_modified(|state| {
            if seq < self.committed.load(Ordering::Acquire) {
                debug!(seq, "discarding result of superseded poll");
                return false;
            }
            self.committed.store(seq, Ordering::Release);
            *state = next;
            true
        })
    }

    /// Spawn a task that runs `poll(1)` every `every`, first after one full
    /// interval. The initial retrying poll is the caller's job.
    pub fn start_auto_refresh(self: &Arc<Self>, every: Duration) -> AutoRefreshHandle {
        let every = every.max(Duration::from_millis(1));
        let controller = Arc::clone(self);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                debug!("auto-refresh tick");
                controller.poll(1).await;
            }
        });
        info!(?every, endpoint = self.endpoint(), "auto-refresh started");
        AutoRefreshHandle { task }
    }

    /// Cancel a running auto-refresh. Safe to call more than once.
    pub fn stop(&self, handle: &AutoRefreshHandle) {
        handle.stop();
    }
}

// One poll between taking the gate and committing its outcome. Dropped
// unsettled means the poll was cancelled mid-flight.
struct PendingPoll<'a> {
    controller: &'a PollingController,
    seq: u64,
    last_good: Option<Arc<Inventory>>,
    settled: bool,
}

impl PendingPoll<'_> {
    fn settle(&mut self, outcome: PollState) -> PollState {
        self.settled = true;
        self.controller.commit(self.seq, outcome.clone());
        outcome
    }
}

impl Drop for PendingPoll<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!(seq = self.seq, "poll cancelled before it finished");
        self.controller.commit(
            self.seq,
            PollState::Failed {
                message: format!("Refresh from {} was cancelled.", self.controller.endpoint()),
                last_good: self.last_good.take(),
            },
        );
    }
}

/// Cancellation handle for an auto-refresh task. Dropping it also cancels
/// the task, so no state update can happen after the owner is gone.
#[derive(Debug)]
pub struct AutoRefreshHandle {
    task: JoinHandle<()>,
}

impl AutoRefreshHandle {
    pub fn stop(&self) {
        if !self.task.is_finished() {
            self.task.abort();
            debug!("auto-refresh stopped");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for AutoRefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
