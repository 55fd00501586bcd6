use askama::Template;

use super::TemplateGlobals;

#[derive(Template)]
#[template(path = "instance_detail.html")]
pub struct InstanceDetailTemplate {
    pub globals: TemplateGlobals,
    pub instance_id: String,
    pub name: String,
    pub state_label: String,
    pub badge_class: String,
    pub details: Vec<(&'static str, String)>,
    pub has_chart: bool,
    /// Pre-rendered `<svg>` markup, empty without history.
    pub chart_svg: String,
    /// (date, value) rows under the chart.
    pub samples: Vec<(String, String)>,
}
