use super::state::SynthesisRun;
use crate::config::DuplicateLeafPolicy;
use crate::metadata::PropertyDescriptor;
use crate::schema::SchemaNode;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::warn;

impl SynthesisRun<'_> {
    /// Place one property at its dotted path, creating intermediate objects on the way.
    pub(crate) fn insert_property(
        &mut self,
        tree: &mut BTreeMap<String, SchemaNode>,
        property: &PropertyDescriptor,
    ) {
        let segments: Vec<&str> = property
            .name
            .split('.')
            .filter(|s| !s.is_empty())
            .collect();
        let Some((leaf_name, parents)) = segments.split_last() else {
            return;
        };

        // each property gets its own cycle guard
        let mut type_stack = Vec::new();
        let Some(leaf) = self.process_leaf(property, &mut type_stack) else {
            return;
        };

        let mut level = tree;
        for segment in parents {
            level = level
                .entry(segment.to_string())
                .or_insert_with(SchemaNode::object)
                .properties_mut();
        }

        match level.entry(leaf_name.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(leaf);
            }
            Entry::Occupied(mut slot) => {
                self.merge_duplicate(&property.name, slot.get_mut(), leaf);
            }
        }
    }

    fn merge_duplicate(&self, name: &str, existing: &mut SchemaNode, incoming: SchemaNode) {
        match self.config.duplicate_leaf {
            DuplicateLeafPolicy::Merge => {
                warn!(property = name, "Duplicate leaf, merging");
                existing.merge(incoming);
            }
            DuplicateLeafPolicy::ReplaceIfDescribed if incoming.description.is_some() => {
                warn!(property = name, "Duplicate leaf, replacing");
                let previous = std::mem::replace(existing, incoming);
                if let Some(children) = previous.properties {
                    existing.merge(SchemaNode::default().with_properties(children));
                }
            }
            DuplicateLeafPolicy::ReplaceIfDescribed | DuplicateLeafPolicy::KeepFirst => {
                warn!(property = name, "Duplicate leaf, keeping the first");
            }
        }
    }
}
