use serde::Serialize;

use crate::models::InstanceState;

/// One inventory entry as returned by the metrics endpoint.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InstanceRecord {
    pub id: String,
    pub name: String,
    pub state: InstanceState,
    pub instance_type: String,
    pub availability_zone: String,
    pub private_ip: String,
    pub project: String,
    pub tenant: String,
    pub owner: String,
    /// Daily CPU averages, most recent last.
    pub cpu_history: Option<Vec<f64>>,
}

impl InstanceRecord {
    /// Creates a record with placeholder values for the given instance ID.
    pub fn new_with_defaults(id: String) -> Self {
        Self {
            id,
            name: "(no name)".into(),
            state: InstanceState::Other(String::new()),
            instance_type: String::new(),
            availability_zone: String::new(),
            private_ip: String::new(),
            project: String::new(),
            tenant: String::new(),
            owner: String::new(),
            cpu_history: None,
        }
    }

    /// "name / id" label used in the first table column.
    pub fn display_label(&self) -> String {
        format!("{} / {}", self.name, self.id)
    }

    /// Link to the detail page, with the id percent-encoded as one path segment.
    pub fn detail_href(&self) -> String {
        format!("/instance/{}", urlencoding::encode(&self.id))
    }

    pub fn has_cpu_history(&self) -> bool {
        self.cpu_history.as_ref().map_or(false, |h| !h.is_empty())
    }

    /// Label/value pairs for the detail panel, in display order.
    pub fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Instance ID", self.id.clone()),
            ("State", self.state.label()),
            ("Type", self.instance_type.clone()),
            ("AZ", self.availability_zone.clone()),
            ("Private IP", self.private_ip.clone()),
            ("Project", self.project.clone()),
            ("Tenant", self.tenant.clone()),
            ("Owner", self.owner.clone()),
        ]
    }
}
