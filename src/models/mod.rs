pub mod app_state;
pub mod field_mapping;
pub mod instance_record;
pub mod instance_state;
pub mod poll_state;
pub mod sample;

pub use app_state::AppState;
pub use field_mapping::{Field, FieldMapping};
pub use instance_record::InstanceRecord;
pub use instance_state::InstanceState;
pub use poll_state::{Inventory, PollState};
pub use sample::Sample;
