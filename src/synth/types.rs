use super::diagnostics::Diagnostics;
use super::wellknown::static_override;
use crate::common::generic::{base_type, container_kind, is_untyped_object, ContainerKind};
use crate::config::SchemaConfig;
use crate::introspect::TypeIntrospector;
use crate::schema::{SchemaFormat, SchemaNode, SchemaType};
use tracing::debug;

/// Basic shape of a type token, tagged with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    /// From an override; used verbatim, never expanded.
    Pinned(SchemaNode),
    /// From the literal token table.
    Literal(SchemaNode),
    Array(SchemaNode),
    Map(SchemaNode),
    Enum(SchemaNode),
    /// A known composite, to be expanded by the tree builder.
    Composite(SchemaNode),
    /// Unknown token, degraded to `string`.
    Unresolved(SchemaNode),
}

impl TypeShape {
    pub fn into_node(self) -> SchemaNode {
        match self {
            TypeShape::Pinned(n)
            | TypeShape::Literal(n)
            | TypeShape::Array(n)
            | TypeShape::Map(n)
            | TypeShape::Enum(n)
            | TypeShape::Composite(n)
            | TypeShape::Unresolved(n) => n,
        }
    }
}

/// Maps a type token to its basic schema shape. Never recurses.
pub struct TypeTable<'a> {
    config: &'a SchemaConfig,
    introspector: &'a dyn TypeIntrospector,
}

impl<'a> TypeTable<'a> {
    pub fn new(config: &'a SchemaConfig, introspector: &'a dyn TypeIntrospector) -> Self {
        Self {
            config,
            introspector,
        }
    }

    /// Resolve `type_token`, optionally in the context of the property it types.
    ///
    /// Overrides win, then the literal table, then introspection, then
    /// container syntax. Anything left degrades to `string` and is counted in
    /// `diagnostics`.
    pub fn resolve(
        &self,
        type_token: &str,
        property: Option<&str>,
        diagnostics: &mut Diagnostics,
    ) -> TypeShape {
        if let Some(pinned) = self.override_for(type_token, property) {
            return TypeShape::Pinned(pinned);
        }
        if let Some(node) = literal_shape(type_token) {
            return TypeShape::Literal(node);
        }
        // a type the introspector knows is never a container by name alone
        let base = base_type(type_token);
        if self.introspector.is_enum(base) {
            return TypeShape::Enum(SchemaNode::string());
        }
        if self.introspector.members(base).is_some() {
            diagnostics.record_candidate(base);
            return TypeShape::Composite(SchemaNode::object());
        }
        match container_kind(type_token) {
            Some(ContainerKind::Array) => return TypeShape::Array(SchemaNode::of(SchemaType::Array)),
            Some(ContainerKind::Map) => return TypeShape::Map(SchemaNode::object()),
            None => {}
        }
        debug!(type_token, "Unresolved type, falling back to string");
        diagnostics.record_missing(type_token.trim());
        TypeShape::Unresolved(SchemaNode::string())
    }

    /// Configured overrides first (property name, then token), then the static table.
    fn override_for(&self, type_token: &str, property: Option<&str>) -> Option<SchemaNode> {
        let overrides = &self.config.type_overrides;
        property
            .and_then(|p| overrides.get(p))
            .or_else(|| overrides.get(type_token.trim()))
            .cloned()
            .or_else(|| static_override(type_token, property))
    }
}

/// The fixed table of well-known scalar tokens.
pub fn literal_shape(type_token: &str) -> Option<SchemaNode> {
    use SchemaFormat as F;
    use SchemaType as T;

    let token = type_token.trim();
    let node = match token {
        "java.lang.String" | "String" | "string" | "text" | "java.lang.CharSequence"
        | "char" | "java.lang.Character" | "java.lang.StringBuilder" => SchemaNode::string(),
        "[]text" | "java.lang.String[]" | "String[]" => SchemaNode::array_of(SchemaNode::string()),
        "boolean" | "java.lang.Boolean" | "bool" => SchemaNode::of(T::Boolean),
        "int" | "long" | "short" | "byte" | "integer" | "java.lang.Integer" | "java.lang.Long"
        | "java.lang.Short" | "java.lang.Byte" | "java.math.BigInteger"
        | "java.util.concurrent.atomic.AtomicInteger"
        | "java.util.concurrent.atomic.AtomicLong" => SchemaNode::of(T::Integer),
        "float" | "double" | "number" | "java.lang.Float" | "java.lang.Double"
        | "java.math.BigDecimal" | "java.lang.Number" => SchemaNode::of(T::Number),
        "byte[]" | "java.lang.Byte[]" | "bytes" => SchemaNode {
            content_encoding: Some("base64".to_string()),
            ..SchemaNode::string()
        },
        "java.util.UUID" | "uuid" => SchemaNode::string().with_format(F::Uuid),
        "java.net.URI" | "java.net.URL" | "uri" | "url" | "org.springframework.core.io.Resource" => {
            SchemaNode::string().with_format(F::Uri)
        }
        "java.net.Inet4Address" | "ipv4" => SchemaNode::string().with_format(F::Ipv4),
        "java.net.Inet6Address" | "ipv6" => SchemaNode::string().with_format(F::Ipv6),
        "java.net.InetAddress" | "hostname" => SchemaNode::string().with_format(F::Hostname),
        "email" => SchemaNode::string().with_format(F::Email),
        "java.time.LocalDate" | "date" => SchemaNode::string().with_format(F::Date),
        "java.time.LocalDateTime" | "java.time.OffsetDateTime" | "java.time.ZonedDateTime"
        | "java.time.Instant" | "java.util.Date" | "java.util.Calendar" | "date-time" => {
            SchemaNode::string().with_format(F::DateTime)
        }
        "java.time.LocalTime" | "java.time.OffsetTime" | "time" => {
            SchemaNode::string().with_format(F::Time)
        }
        "java.time.Duration" | "java.time.Period" | "duration" => {
            SchemaNode::string().with_format(F::Duration)
        }
        "java.util.regex.Pattern" | "regex" => SchemaNode::string().with_format(F::Regex),
        "java.lang.Class" | "java.time.ZoneId" | "java.util.TimeZone"
        | "org.springframework.util.unit.DataSize" | "java.nio.file.Path" | "java.io.File" => {
            SchemaNode::string()
        }
        _ if is_untyped_object(token) => SchemaNode::object(),
        _ => return None,
    };
    Some(node)
}
