pub mod backoff;
pub mod cpu_history;
pub mod poller;

// Re-export commonly used items
pub use backoff::Backoff;
pub use cpu_history::{cpu_history_samples, samples_for_record};
pub use poller::{AutoRefreshHandle, PollingController};
