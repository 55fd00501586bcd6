use serde_json::{Map, Value};

/// Logical fields of an inventory record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Name,
    State,
    InstanceType,
    AvailabilityZone,
    PrivateIp,
    Project,
    Tenant,
    Owner,
    CpuHistory,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Id,
        Field::Name,
        Field::State,
        Field::InstanceType,
        Field::AvailabilityZone,
        Field::PrivateIp,
        Field::Project,
        Field::Tenant,
        Field::Owner,
        Field::CpuHistory,
    ];

    /// Key used in `FIELD_MAP` entries.
    pub fn key(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::State => "state",
            Field::InstanceType => "instance_type",
            Field::AvailabilityZone => "availability_zone",
            Field::PrivateIp => "private_ip",
            Field::Project => "project",
            Field::Tenant => "tenant",
            Field::Owner => "owner",
            Field::CpuHistory => "cpu_history",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        let key = key.trim().to_lowercase().replace('-', "_");
        Field::ALL.into_iter().find(|f| f.key() == key)
    }

    fn default_aliases(self) -> &'static [&'static str] {
        match self {
            Field::Id => &["InstanceId", "InstanceID", "id"],
            Field::Name => &["Name", "name"],
            Field::State => &["State", "state"],
            Field::InstanceType => &["Type", "InstanceType", "instanceType"],
            Field::AvailabilityZone => &["AZ", "AvailabilityZone", "availabilityZone"],
            Field::PrivateIp => &["PrivateIP", "PrivateIpAddress", "privateIp"],
            Field::Project => &["Project", "project"],
            Field::Tenant => &["Tenant", "tenant"],
            Field::Owner => &["Owner", "owner"],
            Field::CpuHistory => &["CPUHistory", "CpuHistory", "cpuHistory"],
        }
    }
}

/// Wire names to try for each logical field. Payload variants disagree on
/// spelling (`InstanceId` vs `InstanceID`), so no single casing is assumed.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldMapping {
    aliases: Vec<(Field, Vec<String>)>,
}

impl Default for FieldMapping {
    fn default() -> Self {
        let aliases = Field::ALL
            .into_iter()
            .map(|f| (f, f.default_aliases().iter().map(|s| s.to_string()).collect()))
            .collect();
        Self { aliases }
    }
}

impl FieldMapping {
    /// Give `alias` priority for the field named `key`. Returns false when the
    /// key does not name a field.
    pub fn prepend_alias(&mut self, key: &str, alias: &str) -> bool {
        let Some(field) = Field::from_key(key) else {
            return false;
        };
        if let Some((_, list)) = self.aliases.iter_mut().find(|(f, _)| *f == field) {
            list.retain(|a| a != alias);
            list.insert(0, alias.to_string());
        }
        true
    }

    pub fn aliases(&self, field: Field) -> &[String] {
        self.aliases
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, list)| list.as_slice())
            .unwrap_or(&[])
    }

    /// Exact alias match first, then a case-insensitive pass over the same
    /// aliases.
    pub fn lookup<'a>(&self, obj: &'a Map<String, Value>, field: Field) -> Option<&'a Value> {
        let aliases = self.aliases(field);
        if let Some(v) = aliases.iter().find_map(|a| obj.get(a)) {
            return Some(v);
        }
        aliases.iter().find_map(|alias| {
            obj.iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(alias))
                .map(|(_, v)| v)
        })
    }
}
