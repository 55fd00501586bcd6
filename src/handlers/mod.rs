pub mod api;
pub mod dashboard;
pub mod helpers;
pub mod instances;

pub use api::{samples_json, state_json};
pub use dashboard::{refresh_post, root_get, stylesheet_get};
pub use instances::instance_detail;
