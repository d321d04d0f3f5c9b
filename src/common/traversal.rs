use crate::schema::{AdditionalProperties, SchemaNode};
use std::collections::BTreeSet;

/// Visit the direct child schemas of `node`.
pub fn for_each_child<'a, F>(node: &'a SchemaNode, f: &mut F)
where
    F: FnMut(&'a SchemaNode),
{
    if let Some(items) = node.items.as_deref() {
        f(items);
    }
    if let Some(properties) = &node.properties {
        properties.values().for_each(&mut *f);
    }
    if let Some(names) = node.property_names.as_deref() {
        f(names);
    }
    if let Some(AdditionalProperties::Schema(value)) = &node.additional_properties {
        f(value.as_ref());
    }
    node.one_of.iter().for_each(f);
}

/// Mutable counterpart of [`for_each_child`].
pub fn for_each_child_mut<F>(node: &mut SchemaNode, f: &mut F)
where
    F: FnMut(&mut SchemaNode),
{
    if let Some(items) = node.items.as_deref_mut() {
        f(items);
    }
    if let Some(properties) = node.properties.as_mut() {
        properties.values_mut().for_each(&mut *f);
    }
    if let Some(names) = node.property_names.as_deref_mut() {
        f(names);
    }
    if let Some(AdditionalProperties::Schema(value)) = node.additional_properties.as_mut() {
        f(value.as_mut());
    }
    node.one_of.iter_mut().for_each(f);
}

/// Collect every `$ref` pointer used in `node` and its descendants.
pub fn collect_references(node: &SchemaNode, found: &mut BTreeSet<String>) {
    if let Some(pointer) = &node.reference {
        found.insert(pointer.clone());
    }
    for_each_child(node, &mut |child| collect_references(child, found));
}
