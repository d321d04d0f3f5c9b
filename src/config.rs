use crate::error::{Error, Result};
use crate::schema::SchemaNode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use url::Url;

pub const DEFAULT_SCHEMA_SPEC: &str = "https://json-schema.org/draft/2020-12/schema";
pub const DEFAULT_SCHEMA_ID: &str = "urn:example";
pub const DEFAULT_TITLE: &str = "Spring Boot Configuration Properties";
pub const DEFAULT_DESCRIPTION: &str = "Auto-generated schema from configuration metadata";

/// Types that are never expanded, whatever the configuration adds.
pub const DEFAULT_EXCLUDE_CLASSES: &[&str] = &[
    "com.fasterxml.jackson.databind.ObjectMapper",
    "java.lang.ClassLoader",
    "org.springframework.boot.context.logging.LoggingApplicationListener",
];

/// What to do when the tree builder meets a leaf path it already filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateLeafPolicy {
    /// Field-level merge, the later non-empty field wins.
    #[default]
    Merge,
    /// Replace the earlier node only when the later one carries a description.
    ReplaceIfDescribed,
    /// Keep the first node and drop the later one.
    KeepFirst,
}

/// Options recognized by the synthesizer.
///
/// Deserializes from a flat TOML table with kebab-case keys; every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SchemaConfig {
    pub schema_spec: String,
    pub schema_id: String,
    pub title: String,
    pub description: String,
    /// Root `additionalProperties`.
    pub allow_additional_properties: bool,
    pub use_validation: bool,
    pub use_openapi: bool,
    /// Extra included path prefixes, merged with the caller's.
    #[serde(alias = "additional-properties")]
    pub include_prefixes: Vec<String>,
    /// Property name or type token mapped to a pinned node.
    pub type_overrides: BTreeMap<String, SchemaNode>,
    /// Extra shared definitions, addressable from `type-overrides`.
    pub definitions: BTreeMap<String, SchemaNode>,
    pub exclude_classes: Vec<String>,
    pub additional_exclude_classes: Vec<String>,
    pub use_definitions: bool,
    pub missing_type_log: bool,
    /// Nesting depth above which an expansion is reported. Never a hard limit.
    pub deep_expansion_warning: usize,
    pub duplicate_leaf: DuplicateLeafPolicy,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            schema_spec: DEFAULT_SCHEMA_SPEC.to_string(),
            schema_id: DEFAULT_SCHEMA_ID.to_string(),
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            allow_additional_properties: true,
            use_validation: true,
            use_openapi: true,
            include_prefixes: vec!["logging".to_string()],
            type_overrides: BTreeMap::new(),
            definitions: BTreeMap::new(),
            exclude_classes: DEFAULT_EXCLUDE_CLASSES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            additional_exclude_classes: Vec::new(),
            use_definitions: true,
            missing_type_log: false,
            deep_expansion_warning: 32,
            duplicate_leaf: DuplicateLeafPolicy::Merge,
        }
    }
}

impl SchemaConfig {
    /// Parse and validate a TOML configuration. `origin` only labels errors.
    pub fn from_toml_str(origin: &str, text: &str) -> Result<Self> {
        let config: SchemaConfig = toml::from_str(text).map_err(|source| Error::ConfigSyntax {
            origin: origin.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&path.display().to_string(), &text)
    }

    /// Reject a dialect that is not an absolute URL and an `$id` that is not a URI.
    pub fn validate(&self) -> Result<()> {
        for value in [&self.schema_spec, &self.schema_id] {
            Url::parse(value).map_err(|source| Error::Url {
                url: value.clone(),
                source,
            })?;
        }
        if let Some(key) = self
            .definitions
            .keys()
            .find(|k| k.is_empty() || k.contains('/'))
        {
            return Err(Error::Config(format!("invalid definition name {key:?}")));
        }
        Ok(())
    }

    /// Whether expansion of `type_token` (already stripped of type arguments) is forbidden.
    pub fn is_excluded(&self, type_token: &str) -> bool {
        self.exclude_classes
            .iter()
            .chain(&self.additional_exclude_classes)
            .any(|c| c == type_token)
    }
}
