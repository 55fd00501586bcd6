/// Values every page shows in its header.
#[derive(Clone, Debug, Default)]
pub struct TemplateGlobals {
    /// Host of the metrics endpoint, shown next to the title.
    pub api_hostname: String,
    /// "Last Update" text, `N/A` before the first successful poll.
    pub last_update: String,
    pub is_loading: bool,
    pub has_error: bool,
    pub error_message: String,
}
