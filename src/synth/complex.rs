use super::definitions::Lookup;
use super::state::SynthesisRun;
use super::types::TypeShape;
use crate::common::generic::{
    base_type, is_placeholder, is_untyped_object, item_type, map_types, unwrap_wildcard,
};
use crate::common::names::{kebab_case, with_lowercase_variants};
use crate::metadata::PropertyDescriptor;
use crate::schema::{AdditionalProperties, SchemaNode};
use std::collections::BTreeMap;
use tracing::{debug, warn};

impl SynthesisRun<'_> {
    /// Complete shape of `type_token`: arrays get items, maps get value
    /// shapes, enums get literals and composites are expanded or referenced.
    ///
    /// `property_name` enables property-name overrides; it is `None` for
    /// item and value types. `context` names the property being built.
    pub(crate) fn shape_for(
        &mut self,
        type_token: &str,
        property_name: Option<&str>,
        context: &PropertyDescriptor,
        type_stack: &mut Vec<String>,
    ) -> SchemaNode {
        let token = unwrap_wildcard(type_token);
        match self.types.resolve(token, property_name, &mut self.diagnostics) {
            TypeShape::Pinned(node) | TypeShape::Literal(node) | TypeShape::Unresolved(node) => node,
            TypeShape::Enum(mut node) => {
                node.enum_values = self.enum_literals(token);
                node
            }
            TypeShape::Array(mut node) => {
                let items = match item_type(token) {
                    Some(item) => self.element_shape(&item, context, type_stack),
                    None => SchemaNode::object(),
                };
                node.items = Some(Box::new(items));
                node
            }
            TypeShape::Map(mut node) => {
                self.fill_map(&mut node, token, context, type_stack);
                node
            }
            TypeShape::Composite(node) if self.introspector.is_generic(base_type(token)) => {
                debug!(type_token = token, "Generic type, not expanding");
                node
            }
            TypeShape::Composite(_) => self.complex_shape(token, context, type_stack),
        }
    }

    /// Shape of an array item or map value; type variables and generic types stay bare objects.
    fn element_shape(
        &mut self,
        type_token: &str,
        context: &PropertyDescriptor,
        type_stack: &mut Vec<String>,
    ) -> SchemaNode {
        let token = unwrap_wildcard(type_token);
        if self.is_type_variable(token) || self.introspector.is_generic(base_type(token)) {
            return SchemaNode::object();
        }
        self.shape_for(token, None, context, type_stack)
    }

    /// A placeholder-looking token the introspector does not know as a type.
    fn is_type_variable(&self, type_token: &str) -> bool {
        is_placeholder(type_token)
            && !self.introspector.is_enum(type_token)
            && self.introspector.members(type_token).is_none()
    }

    fn fill_map(
        &mut self,
        node: &mut SchemaNode,
        type_token: &str,
        context: &PropertyDescriptor,
        type_stack: &mut Vec<String>,
    ) {
        let (key, value) = map_types(type_token);

        if let Some(key) = key {
            let key = unwrap_wildcard(&key);
            if self.introspector.is_enum(base_type(key)) {
                let literals = self.enum_literals(key);
                if !literals.is_empty() {
                    node.property_names = Some(Box::new(SchemaNode {
                        enum_values: literals,
                        ..SchemaNode::default()
                    }));
                }
            }
        }

        let value_shape = match value {
            Some(value) if !is_untyped_object(&value) => {
                self.element_shape(&value, context, type_stack)
            }
            _ => SchemaNode::object(),
        };
        node.additional_properties = Some(AdditionalProperties::Schema(Box::new(value_shape)));
    }

    fn enum_literals(&self, type_token: &str) -> Vec<String> {
        with_lowercase_variants(&self.introspector.enum_values(base_type(type_token)))
    }

    /// A composite occurrence: a `$ref` to its shared definition, or the
    /// expanded object inline when promotion is off or the type cannot be shared.
    pub(crate) fn complex_shape(
        &mut self,
        type_token: &str,
        context: &PropertyDescriptor,
        type_stack: &mut Vec<String>,
    ) -> SchemaNode {
        let base = base_type(type_token).to_string();

        if !self.config.use_definitions
            || type_stack.contains(&base)
            || self.config.is_excluded(&base)
        {
            return self.inline_object(&base, context, type_stack);
        }

        match self.registry.lookup(&base) {
            Lookup::Ready => {
                self.registry.record_occurrence(&base);
                SchemaNode::reference(self.registry.reference(&base))
            }
            Lookup::Empty | Lookup::Pending => SchemaNode::object(),
            Lookup::Unknown => {
                self.registry.begin(&base);
                let expanded = self
                    .expand(&base, context, type_stack)
                    .map(|properties| SchemaNode::object().with_properties(properties));
                let found = expanded.is_some();
                self.registry.register(&base, expanded);
                if found {
                    self.registry.record_occurrence(&base);
                    SchemaNode::reference(self.registry.reference(&base))
                } else {
                    SchemaNode::object()
                }
            }
        }
    }

    fn inline_object(
        &mut self,
        type_token: &str,
        context: &PropertyDescriptor,
        type_stack: &mut Vec<String>,
    ) -> SchemaNode {
        match self.expand(type_token, context, type_stack) {
            Some(properties) => SchemaNode::object().with_properties(properties),
            None => SchemaNode::object(),
        }
    }

    /// Member properties of a composite type, or `None` when there are none to show.
    ///
    /// Cycles and excluded types stop here. Members are processed as derived
    /// properties named `<context>.<kebab-member>`, unless the catalogue already
    /// describes that name.
    pub(crate) fn expand(
        &mut self,
        type_token: &str,
        context: &PropertyDescriptor,
        type_stack: &mut Vec<String>,
    ) -> Option<BTreeMap<String, SchemaNode>> {
        let base = base_type(type_token);

        if type_stack.iter().any(|t| t == base) {
            warn!(
                type_token = base,
                property = %context.name,
                "Cyclic type reference, not expanding further"
            );
            self.diagnostics.record_cycle(base, &context.name);
            return None;
        }
        if self.config.is_excluded(base) {
            warn!(type_token = base, property = %context.name, "Excluded type, not expanding");
            self.diagnostics.record_excluded(base, &context.name);
            return None;
        }
        let members = self.introspector.members(base)?;

        type_stack.push(base.to_string());
        let depth = type_stack.len();
        if depth > self.config.deep_expansion_warning {
            warn!(type_token = base, property = %context.name, depth, "Deep type expansion");
            self.diagnostics.record_deep(base, &context.name, depth);
        }

        let mut properties = BTreeMap::new();
        for member in members {
            let member_base = base_type(unwrap_wildcard(&member.type_token));
            if self.config.is_excluded(member_base) {
                debug!(member = %member.name, type_token = member_base, "Skipping excluded member");
                self.diagnostics.record_excluded(member_base, &context.name);
                continue;
            }

            let key = kebab_case(&member.name);
            let name = format!("{}.{}", context.name, key);
            let derived = match self.catalogue.get(&name) {
                Some(explicit) => {
                    let mut explicit = explicit.clone();
                    if explicit.type_token.is_none() {
                        explicit.type_token = Some(member.type_token.clone());
                    }
                    if explicit.declaring_type.is_none() {
                        explicit.declaring_type = Some(base.to_string());
                    }
                    explicit
                }
                None => PropertyDescriptor::derived(name, &member.type_token, base),
            };

            if let Some(node) = self.process_leaf(&derived, type_stack) {
                properties.insert(key, node);
            }
        }
        type_stack.pop();

        if properties.is_empty() {
            None
        } else {
            Some(properties)
        }
    }
}
