use regex::Regex;
use std::sync::LazyLock;

static CASE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("case boundary pattern"));

static UNSAFE_KEY_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("definition key pattern"));

/// Prefix of every pointer into the document's `$defs`.
pub const DEFINITIONS_POINTER: &str = "#/$defs/";

/// Convert a member name to the kebab-case form used in configuration files.
///
/// `maxPoolSize` becomes `max-pool-size`; names that are already kebab-case
/// come back unchanged.
pub fn kebab_case(name: &str) -> String {
    CASE_BOUNDARY
        .replace_all(name, "$1-$2")
        .to_lowercase()
}

/// Convert a kebab-case (or snake_case) path segment back to a camelCase member name.
pub fn camel_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut upper_next = false;
    for ch in segment.chars() {
        if ch == '-' || ch == '_' {
            upper_next = !out.is_empty();
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Last component of a dotted (or `$`-nested) type token.
pub fn simple_name(type_token: &str) -> &str {
    type_token
        .rsplit(['.', '$'])
        .next()
        .unwrap_or(type_token)
}

/// Normalize a type token into a key that is safe inside a JSON pointer.
///
/// Nested-type separators become dots; anything else outside
/// `[A-Za-z0-9_.-]` becomes an underscore.
pub fn definition_key(type_token: &str) -> String {
    let dotted = type_token.trim().replace(['$', '/'], ".");
    UNSAFE_KEY_CHARS.replace_all(&dotted, "_").into_owned()
}

pub fn definition_pointer(key: &str) -> String {
    format!("{DEFINITIONS_POINTER}{key}")
}

/// Definition key addressed by a local `#/$defs/...` pointer.
pub fn key_from_pointer(pointer: &str) -> Option<&str> {
    pointer
        .strip_prefix(DEFINITIONS_POINTER)
        .filter(|key| !key.is_empty())
}

/// Each value in its canonical case followed by its lower-cased form, without repeats.
pub fn with_lowercase_variants<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len() * 2);
    for value in values {
        for candidate in [value.as_ref().to_string(), value.as_ref().to_lowercase()] {
            if !out.contains(&candidate) {
                out.push(candidate);
            }
        }
    }
    out
}
