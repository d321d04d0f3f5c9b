use super::definitions::DefinitionRegistry;
use super::diagnostics::Diagnostics;
use super::types::TypeTable;
use super::wellknown;
use crate::config::SchemaConfig;
use crate::introspect::{MemberRefinements, TypeIntrospector};
use crate::metadata::Catalogue;
use crate::schema::SchemaDocument;

/// Result of one synthesis run.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub document: SchemaDocument,
    pub diagnostics: Diagnostics,
}

/// Everything one run reads and owns.
///
/// The registry and diagnostics live here and nowhere else, so every run
/// starts from a clean slate.
pub(crate) struct SynthesisRun<'a> {
    pub config: &'a SchemaConfig,
    pub catalogue: &'a Catalogue,
    pub introspector: &'a dyn TypeIntrospector,
    pub refinements: &'a dyn MemberRefinements,
    pub types: TypeTable<'a>,
    pub registry: DefinitionRegistry,
    pub diagnostics: Diagnostics,
}

impl<'a> SynthesisRun<'a> {
    pub fn new(
        config: &'a SchemaConfig,
        catalogue: &'a Catalogue,
        introspector: &'a dyn TypeIntrospector,
        refinements: &'a dyn MemberRefinements,
    ) -> Self {
        let mut registry = DefinitionRegistry::new();
        for (key, node) in wellknown::definitions() {
            registry.register_pinned(key, node);
        }
        for (key, node) in &config.definitions {
            registry.register_pinned(key, node.clone());
        }

        Self {
            config,
            catalogue,
            introspector,
            refinements,
            types: TypeTable::new(config, introspector),
            registry,
            diagnostics: Diagnostics::default(),
        }
    }
}
