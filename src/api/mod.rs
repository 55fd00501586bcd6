// Metrics endpoint access
pub mod client;
pub mod error;
pub mod instances;

// Re-export commonly used items
pub use client::{set_silent, Fetcher, HttpFetcher};
pub use error::FetchError;
pub use instances::parse_inventory;
