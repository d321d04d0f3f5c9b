use super::definitions::DefinitionRegistry;
use super::diagnostics::Diagnostics;
use crate::common::names::key_from_pointer;
use crate::common::traversal::{collect_references, for_each_child_mut};
use crate::schema::SchemaNode;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Inline single-use definitions and collect the shared ones that are still referenced.
pub(crate) fn finalize(
    properties: &mut BTreeMap<String, SchemaNode>,
    registry: &DefinitionRegistry,
    diagnostics: &mut Diagnostics,
) -> BTreeMap<String, SchemaNode> {
    for node in properties.values_mut() {
        inline_single_use(node, registry);
    }

    let mut pending = BTreeSet::new();
    for node in properties.values() {
        collect_references(node, &mut pending);
    }

    let mut definitions = BTreeMap::new();
    let mut queue: Vec<String> = pending.into_iter().collect();
    while let Some(pointer) = queue.pop() {
        let Some(key) = key_from_pointer(&pointer) else {
            continue;
        };
        if definitions.contains_key(key) {
            continue;
        }
        match registry.by_key(key) {
            Some((body, _)) => {
                let mut body = body.clone();
                inline_single_use(&mut body, registry);
                let mut nested = BTreeSet::new();
                collect_references(&body, &mut nested);
                queue.extend(nested);
                definitions.insert(key.to_string(), body);
            }
            None => {
                warn!(pointer = %pointer, "Reference to an unknown definition");
                diagnostics.dangling_references.insert(pointer.clone());
            }
        }
    }
    definitions
}

/// Replace every reference to a non-shared definition with the definition
/// body, keeping the fields set at the reference site.
fn inline_single_use(node: &mut SchemaNode, registry: &DefinitionRegistry) {
    if let Some(body) = node
        .reference
        .as_deref()
        .and_then(key_from_pointer)
        .and_then(|key| registry.by_key(key))
        .filter(|(_, shared)| !shared)
        .map(|(body, _)| body.clone())
    {
        let mut site = std::mem::take(node);
        site.reference = None;
        *node = body;
        node.merge(site);
    }
    for_each_child_mut(node, &mut |child| inline_single_use(child, registry));
}
