//! Shared definitions every run knows about, and the static overrides pointing at them.

use crate::common::names::{definition_pointer, with_lowercase_variants};
use crate::schema::{AdditionalProperties, SchemaNode, SchemaType};
use serde_json::json;

pub const LOGGER_LEVEL: &str = "loggerLevel";
pub const LOGGER_LEVEL_PROP: &str = "loggerLevelProp";
pub const LOCALE: &str = "locale";
pub const CHARSET: &str = "charset";

const LOG_LEVELS: &[&str] = &["OFF", "FATAL", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"];

const LOCALE_PATTERN: &str = r"^[a-zA-Z]{2,8}([_-][a-zA-Z0-9]{1,8})*$";
const CHARSET_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9._:+-]*$";

/// Pinned definitions, keyed by their `$defs` name.
pub fn definitions() -> Vec<(&'static str, SchemaNode)> {
    let logger_level = SchemaNode {
        enum_values: with_lowercase_variants(LOG_LEVELS),
        ..SchemaNode::string()
    };

    let logger_level_prop = SchemaNode {
        additional_properties: Some(AdditionalProperties::Schema(Box::new(SchemaNode {
            one_of: vec![
                SchemaNode::reference(definition_pointer(LOGGER_LEVEL)),
                SchemaNode::reference(definition_pointer(LOGGER_LEVEL_PROP)),
            ],
            ..SchemaNode::default()
        }))),
        ..SchemaNode::of(SchemaType::Object)
    };

    let locale = SchemaNode {
        pattern: Some(LOCALE_PATTERN.to_string()),
        examples: vec![json!("en"), json!("en_US"), json!("de-CH")],
        ..SchemaNode::string()
    };

    let charset = SchemaNode {
        pattern: Some(CHARSET_PATTERN.to_string()),
        examples: ["UTF-8", "US-ASCII", "ISO-8859-1", "UTF-16"]
            .into_iter()
            .map(|c| json!(c))
            .collect(),
        ..SchemaNode::string()
    };

    vec![
        (LOGGER_LEVEL, logger_level),
        (LOGGER_LEVEL_PROP, logger_level_prop),
        (LOCALE, locale),
        (CHARSET, charset),
    ]
}

/// Static override for a property name or exact type token.
pub fn static_override(type_token: &str, property: Option<&str>) -> Option<SchemaNode> {
    if property == Some("logging.level") {
        return Some(SchemaNode::reference(definition_pointer(LOGGER_LEVEL_PROP)));
    }
    let key = match type_token.trim() {
        "java.util.Locale" | "locale" => LOCALE,
        "java.nio.charset.Charset" | "charset" => CHARSET,
        "org.springframework.boot.logging.LogLevel" | "log-level" => LOGGER_LEVEL,
        _ => return None,
    };
    Some(SchemaNode::reference(definition_pointer(key)))
}
