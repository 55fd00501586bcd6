use askama::Template;

use crate::models::InstanceRecord;
use super::TemplateGlobals;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate<'a> {
    pub globals: TemplateGlobals,
    pub records: &'a [InstanceRecord],
    /// Refresh interval for the page's meta refresh, in seconds.
    pub refresh_secs: u64,
}
