use regex::Regex;
use std::sync::LazyLock;

static TYPE_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][0-9]?$").expect("type variable pattern"));

/// Container shapes recognised from a type token's syntax alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Array,
    Map,
}

const ARRAY_NAMES: &[&str] = &[
    "list",
    "set",
    "collection",
    "iterable",
    "arraylist",
    "linkedlist",
    "hashset",
    "linkedhashset",
    "treeset",
    "sortedset",
    "navigableset",
    "enumset",
    "queue",
    "deque",
    "array",
    "vec",
    "sequence",
];

const MAP_NAMES: &[&str] = &[
    "map",
    "hashmap",
    "linkedhashmap",
    "treemap",
    "sortedmap",
    "navigablemap",
    "concurrentmap",
    "concurrenthashmap",
    "enummap",
    "multivaluemap",
    "properties",
    "dictionary",
];

/// The part of a type token before its type arguments: `java.util.List<T>` gives `java.util.List`.
pub fn base_type(type_token: &str) -> &str {
    let token = type_token.trim();
    match token.find('<') {
        Some(idx) => token[..idx].trim(),
        None => token,
    }
}

/// Top-level type arguments of a generic token.
///
/// Nested arguments are kept intact, so `Map<String,List<Map<K,V>>>` yields
/// `["String", "List<Map<K,V>>"]`. A raw token yields an empty list.
pub fn type_arguments(type_token: &str) -> Vec<String> {
    let token = type_token.trim();
    let (Some(open), Some(close)) = (token.find('<'), token.rfind('>')) else {
        return Vec::new();
    };
    if close <= open {
        return Vec::new();
    }

    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for ch in token[open + 1..close].chars() {
        match ch {
            ',' if depth == 0 => {
                args.push(current.trim().to_string());
                current.clear();
            }
            '<' => {
                depth += 1;
                current.push(ch);
            }
            '>' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        args.push(current.trim().to_string());
    }
    args.retain(|a| !a.is_empty());
    args
}

/// Component type of an array token (`byte[]`, `String[]`, `[]text`).
pub fn array_component(type_token: &str) -> Option<&str> {
    let token = type_token.trim();
    token
        .strip_suffix("[]")
        .or_else(|| token.strip_prefix("[]"))
        .map(str::trim)
        .filter(|c| !c.is_empty())
}

/// `? extends X` unwraps to `X`; every other token is returned trimmed.
pub fn unwrap_wildcard(type_token: &str) -> &str {
    let token = type_token.trim();
    token
        .strip_prefix("? extends ")
        .map(str::trim)
        .unwrap_or(token)
}

/// Unbounded generic placeholders: a type variable (`T`, `V1`), `?`, or `? super X`.
pub fn is_placeholder(type_token: &str) -> bool {
    let token = type_token.trim();
    token == "?" || token.starts_with("? super ") || TYPE_VARIABLE.is_match(token)
}

/// Whether a token names the untyped root object.
pub fn is_untyped_object(type_token: &str) -> bool {
    matches!(
        base_type(type_token),
        "java.lang.Object" | "Object" | "object" | "any"
    )
}

/// Container kind by the token's simple name, case-insensitively.
pub fn container_kind(type_token: &str) -> Option<ContainerKind> {
    if array_component(type_token).is_some() {
        return Some(ContainerKind::Array);
    }
    let simple = super::names::simple_name(base_type(type_token)).to_ascii_lowercase();
    if ARRAY_NAMES.contains(&simple.as_str()) {
        Some(ContainerKind::Array)
    } else if MAP_NAMES.contains(&simple.as_str()) {
        Some(ContainerKind::Map)
    } else {
        None
    }
}

/// Item type of an array-like token: the array component or the first type argument.
pub fn item_type(type_token: &str) -> Option<String> {
    if let Some(component) = array_component(type_token) {
        return Some(component.to_string());
    }
    type_arguments(type_token).into_iter().next()
}

/// Key and value types of a map-like token.
///
/// A single type argument is taken as the value type; `EnumMap<K,V>` and
/// friends follow the usual key-then-value order.
pub fn map_types(type_token: &str) -> (Option<String>, Option<String>) {
    let mut args = type_arguments(type_token).into_iter();
    match (args.next(), args.next()) {
        (Some(key), Some(value)) => (Some(key), Some(value)),
        (Some(value), None) => (None, Some(value)),
        _ => (None, None),
    }
}
