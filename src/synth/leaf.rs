use super::state::SynthesisRun;
use crate::common::names::{camel_case, kebab_case};
use crate::introspect::Member;
use crate::metadata::PropertyDescriptor;
use crate::schema::{SchemaFormat, SchemaNode, SchemaType, XDeprecation};
use serde_json::Value;
use tracing::{debug, warn};

impl SynthesisRun<'_> {
    /// Full node for one property, or `None` when it cannot or must not appear.
    pub(crate) fn process_leaf(
        &mut self,
        property: &PropertyDescriptor,
        type_stack: &mut Vec<String>,
    ) -> Option<SchemaNode> {
        if property.is_removed() {
            debug!(property = %property.name, "Skipping removed property");
            return None;
        }
        let Some(declared) = property
            .type_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        else {
            if property.is_group_property {
                debug!(property = %property.name, "Group has no type");
            } else {
                warn!(property = %property.name, "Property has no type, skipping");
            }
            return None;
        };

        // recorded metadata can be stale, the declaring type's member wins
        let member = self.declared_member(property);
        let type_token = match &member {
            Some(m) if m.type_token.trim() != declared => {
                debug!(
                    property = %property.name,
                    recorded = declared,
                    introspected = %m.type_token,
                    "Using introspected member type"
                );
                m.type_token.clone()
            }
            _ => declared.to_string(),
        };

        let mut node = self.shape_for(&type_token, Some(&property.name), property, type_stack);
        if property.is_group_property && !node.is_reference() && !node.is_kind(SchemaType::Object) {
            node = SchemaNode::object();
        }
        annotate(&mut node, property);
        self.refine(&mut node, property, member.as_ref());
        Some(node)
    }

    fn declared_member(&self, property: &PropertyDescriptor) -> Option<Member> {
        let declaring = property.declaring_type.as_deref()?;
        let segment = property.last_segment();
        self.introspector
            .members(declaring)?
            .into_iter()
            .find(|m| m.name == segment || kebab_case(&m.name) == segment)
    }

    fn refine(&self, node: &mut SchemaNode, property: &PropertyDescriptor, member: Option<&Member>) {
        let (validation, openapi) = (self.config.use_validation, self.config.use_openapi);
        if !validation && !openapi {
            return;
        }
        let Some(declaring) = property.declaring_type.as_deref() else {
            return;
        };
        let member_name = member
            .map(|m| m.name.clone())
            .unwrap_or_else(|| camel_case(property.last_segment()));
        let Some(refinement) = self.refinements.refinements_for(declaring, &member_name) else {
            return;
        };

        if validation {
            if refinement.minimum.is_some() {
                node.minimum = refinement.minimum.clone();
            }
            if refinement.maximum.is_some() {
                node.maximum = refinement.maximum.clone();
            }
            if refinement.min_length.is_some() {
                node.min_length = refinement.min_length;
            }
            if refinement.max_length.is_some() {
                node.max_length = refinement.max_length;
            }
            if refinement.pattern.is_some() {
                node.pattern = refinement.pattern.clone();
            }
            if refinement.not_empty && node.min_length.unwrap_or(0) == 0 {
                node.min_length = Some(1);
            }
            if refinement.email {
                node.format = Some(SchemaFormat::Email);
            }
        }

        if openapi {
            if let Some(description) = refinement.description.filter(|d| !d.trim().is_empty()) {
                node.description = Some(description);
            }
            if let Some(format) = refinement.format.as_deref() {
                match SchemaFormat::parse(format) {
                    Some(format) => node.format = Some(format),
                    None => debug!(property = %property.name, format, "Ignoring unknown format"),
                }
            }
            if let Some(example) = refinement.example.filter(|e| !e.is_empty()) {
                if node.examples.is_empty() {
                    node.examples.push(Value::String(example));
                }
            }
            if refinement.deprecated {
                node.deprecated = Some(true);
            }
        }
    }
}

/// Description, default, hint examples and deprecation details.
fn annotate(node: &mut SchemaNode, property: &PropertyDescriptor) {
    if let Some(description) = property
        .description
        .as_ref()
        .filter(|d| !d.trim().is_empty())
    {
        node.description = Some(description.clone());
    }
    if let Some(default) = property.default_value.as_ref().filter(|v| !v.is_null()) {
        node.default_value = Some(default.clone());
    }
    for hint in &property.hint_values {
        if !hint.value.is_null() && !node.examples.contains(&hint.value) {
            node.examples.push(hint.value.clone());
        }
    }
    if property.is_deprecated() {
        node.deprecated = Some(true);
        if let Some(deprecation) = &property.deprecation {
            let details = XDeprecation {
                reason: deprecation.reason.clone(),
                replacement: deprecation.replacement.clone(),
                since: deprecation.since.clone(),
                level: deprecation.severity.map(|s| s.as_str().to_string()),
            };
            if !details.is_empty() {
                node.x_deprecation = Some(details);
            }
        }
    }
}
