use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// JSON Schema instance types (2020-12 core, section 4.2.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

/// Standard `format` annotations emitted by the synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaFormat {
    DateTime,
    Time,
    Date,
    Duration,
    Email,
    IdnEmail,
    Hostname,
    IdnHostname,
    Ipv4,
    Ipv6,
    Uri,
    UriReference,
    Iri,
    IriReference,
    Uuid,
    JsonPointer,
    RelativeJsonPointer,
    Regex,
}

impl SchemaFormat {
    /// Parse a format keyword (`"date-time"`, `"EMAIL"`, ...). Unknown keywords yield `None`.
    pub fn parse(keyword: &str) -> Option<Self> {
        let normalized = keyword.trim().to_ascii_lowercase().replace('_', "-");
        serde_json::from_value(Value::String(normalized)).ok()
    }
}

/// `additionalProperties` is either a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<SchemaNode>),
}

/// `x-deprecation` extension carrying the deprecation details of a property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XDeprecation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl XDeprecation {
    pub fn is_empty(&self) -> bool {
        [&self.reason, &self.replacement, &self.since, &self.level]
            .iter()
            .all(|f| f.as_deref().map_or(true, str::is_empty))
    }
}

/// One node of the synthesized schema tree.
///
/// A node with `reference` set is a pointer to a shared definition; the
/// synthesizer never sets a `type` next to it, only annotations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaNode {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<SchemaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<SchemaFormat>,
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Value>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_names: Option<Box<SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaNode>,
    #[serde(rename = "x-deprecation", skip_serializing_if = "Option::is_none")]
    pub x_deprecation: Option<XDeprecation>,
}

impl SchemaNode {
    pub fn of(kind: SchemaType) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn string() -> Self {
        Self::of(SchemaType::String)
    }

    pub fn object() -> Self {
        Self::of(SchemaType::Object)
    }

    pub fn array_of(items: SchemaNode) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of(SchemaType::Array)
        }
    }

    /// A bare `$ref` node.
    pub fn reference(pointer: impl Into<String>) -> Self {
        Self {
            reference: Some(pointer.into()),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: SchemaFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_properties(mut self, properties: BTreeMap<String, SchemaNode>) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }

    pub fn is_kind(&self, kind: SchemaType) -> bool {
        self.kind == Some(kind)
    }

    /// Child `properties`, created on demand.
    pub fn properties_mut(&mut self) -> &mut BTreeMap<String, SchemaNode> {
        self.properties.get_or_insert_with(BTreeMap::new)
    }

    /// Merge `other` into `self`: every field set on `other` wins, lists are
    /// unioned in first-seen order and `properties` are merged key by key.
    pub fn merge(&mut self, other: SchemaNode) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() { self.$field = other.$field; })*
            };
        }
        take!(
            kind,
            format,
            reference,
            description,
            deprecated,
            default_value,
            pattern,
            minimum,
            maximum,
            min_length,
            max_length,
            content_encoding,
            items,
            property_names,
            additional_properties,
            x_deprecation
        );

        for example in other.examples {
            if !self.examples.contains(&example) {
                self.examples.push(example);
            }
        }
        for value in other.enum_values {
            if !self.enum_values.contains(&value) {
                self.enum_values.push(value);
            }
        }
        for alternative in other.one_of {
            if !self.one_of.contains(&alternative) {
                self.one_of.push(alternative);
            }
        }

        if let Some(incoming) = other.properties {
            let properties = self.properties_mut();
            for (name, node) in incoming {
                match properties.get_mut(&name) {
                    Some(existing) => existing.merge(node),
                    None => {
                        properties.insert(name, node);
                    }
                }
            }
        }
    }
}

/// The root of a synthesized schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(rename = "$schema")]
    pub schema: String,
    #[serde(rename = "$id")]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: SchemaType,
    #[serde(rename = "$defs", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub definitions: BTreeMap<String, SchemaNode>,
    #[serde(default)]
    pub properties: BTreeMap<String, SchemaNode>,
    #[serde(rename = "additionalProperties")]
    pub additional_properties: bool,
}

impl SchemaDocument {
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
