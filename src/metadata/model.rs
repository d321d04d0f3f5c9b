use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Deprecation severity. `error` marks a removed property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Severity {
    #[default]
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        // anything but "error" is advisory
        if raw.trim().eq_ignore_ascii_case("error") {
            Ok(Severity::Error)
        } else {
            Ok(Severity::Warning)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Deprecation {
    pub reason: Option<String>,
    pub replacement: Option<String>,
    pub since: Option<String>,
    #[serde(alias = "level")]
    pub severity: Option<Severity>,
}

impl Deprecation {
    fn merge(&mut self, other: Deprecation) {
        overwrite(&mut self.reason, other.reason);
        overwrite(&mut self.replacement, other.replacement);
        overwrite(&mut self.since, other.since);
        if other.severity.is_some() {
            self.severity = other.severity;
        }
    }
}

/// One suggested value for a property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HintValue {
    pub value: Value,
    pub description: Option<String>,
    pub deprecated: Option<bool>,
}

/// A group entry: declares an object node rather than a leaf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub type_token: Option<String>,
    #[serde(alias = "sourceType")]
    pub declaring_type: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub type_token: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "sourceType")]
    pub declaring_type: Option<String>,
    pub default_value: Option<Value>,
    pub deprecated: Option<bool>,
    pub deprecation: Option<Deprecation>,
    pub hints: Vec<HintValue>,
}

/// A top-level hint entry naming the property its values belong to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HintEntry {
    pub name: String,
    pub values: Vec<HintValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoredEntry {
    pub name: String,
}

/// `ignored` is either a bare list or wrapped as `{"properties": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IgnoredList {
    List(Vec<IgnoredEntry>),
    Wrapped {
        #[serde(default)]
        properties: Vec<IgnoredEntry>,
    },
}

impl Default for IgnoredList {
    fn default() -> Self {
        IgnoredList::List(Vec::new())
    }
}

impl IgnoredList {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let entries = match self {
            IgnoredList::List(entries) => entries,
            IgnoredList::Wrapped { properties } => properties,
        };
        entries.iter().map(|e| e.name.as_str())
    }
}

/// One metadata source, as read from disk or the network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFragment {
    pub groups: Vec<GroupEntry>,
    pub properties: Vec<PropertyEntry>,
    pub hints: Vec<HintEntry>,
    pub ignored: IgnoredList,
}

/// One configuration property after merging every fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub name: String,
    pub type_token: Option<String>,
    pub description: Option<String>,
    pub declaring_type: Option<String>,
    pub default_value: Option<Value>,
    pub deprecated: Option<bool>,
    pub deprecation: Option<Deprecation>,
    pub hint_values: Vec<HintValue>,
    pub is_group_property: bool,
}

/// Merged catalogue, keyed (and iterated) by property name.
pub type Catalogue = BTreeMap<String, PropertyDescriptor>;

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, type_token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_token: Some(type_token.into()),
            ..Self::default()
        }
    }

    /// Descriptor synthesized for a member of `declaring_type`.
    pub fn derived(name: String, type_token: &str, declaring_type: &str) -> Self {
        Self {
            name,
            type_token: Some(type_token.to_string()),
            declaring_type: Some(declaring_type.to_string()),
            ..Self::default()
        }
    }

    pub fn from_entry(entry: PropertyEntry) -> Self {
        let mut descriptor = Self {
            name: entry.name.clone(),
            ..Self::default()
        };
        descriptor.merge_property(entry);
        descriptor
    }

    /// Explicitly deprecated, or carrying deprecation details without an explicit flag.
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
            .unwrap_or_else(|| self.deprecation.is_some())
    }

    /// Deprecated with `error` severity: the property no longer exists.
    pub fn is_removed(&self) -> bool {
        self.is_deprecated()
            && self
                .deprecation
                .as_ref()
                .and_then(|d| d.severity)
                == Some(Severity::Error)
    }

    pub fn last_segment(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Field-level merge of a later leaf entry: non-empty incoming values win.
    pub fn merge_property(&mut self, entry: PropertyEntry) {
        overwrite(&mut self.type_token, entry.type_token);
        overwrite(&mut self.description, entry.description);
        overwrite(&mut self.declaring_type, entry.declaring_type);
        if entry.default_value.as_ref().is_some_and(|v| !v.is_null()) {
            self.default_value = entry.default_value;
        }
        if entry.deprecated.is_some() {
            self.deprecated = entry.deprecated;
        }
        if let Some(incoming) = entry.deprecation {
            match self.deprecation.as_mut() {
                Some(existing) => existing.merge(incoming),
                None => self.deprecation = Some(incoming),
            }
        }
        self.attach_hints(entry.hints);
    }

    pub fn merge_group(&mut self, group: GroupEntry) {
        overwrite(&mut self.type_token, group.type_token);
        overwrite(&mut self.description, group.description);
        overwrite(&mut self.declaring_type, group.declaring_type);
        self.is_group_property = true;
    }

    /// Append hint values not already present, keeping first-seen order.
    pub fn attach_hints(&mut self, values: Vec<HintValue>) {
        for value in values {
            if !self.hint_values.iter().any(|h| h.value == value.value) {
                self.hint_values.push(value);
            }
        }
    }
}

fn overwrite(slot: &mut Option<String>, incoming: Option<String>) {
    if let Some(value) = incoming.filter(|v| !v.trim().is_empty()) {
        *slot = Some(value);
    }
}
