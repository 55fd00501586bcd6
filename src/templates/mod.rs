// Shared header values
pub mod base_template;
pub use base_template::TemplateGlobals;

// Individual template files
pub mod dashboard_template;
pub mod instance_detail_template;

pub use dashboard_template::DashboardTemplate;
pub use instance_detail_template::InstanceDetailTemplate;
