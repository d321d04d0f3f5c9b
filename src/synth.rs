//! The schema synthesis engine.
//!
//! [`SchemaBuilder::build`] walks a merged [`Catalogue`], resolves every
//! included property to a schema node and assembles the document.
//! Composite types are expanded through a [`TypeIntrospector`]; types seen
//! at more than one site are emitted once under `$defs` and referenced.

pub mod complex;
pub mod definitions;
pub mod diagnostics;
pub mod leaf;
pub mod postprocess;
pub mod state;
pub mod tree;
pub mod types;
pub mod wellknown;

pub use definitions::{DefinitionRegistry, Lookup};
pub use diagnostics::{DeepExpansion, Diagnostics, TypeSite};
pub use state::Synthesis;
pub use types::{literal_shape, TypeShape, TypeTable};

use crate::common::{is_path_within, matches_included};
use crate::config::SchemaConfig;
use crate::introspect::{MemberRefinements, NoIntrospection, TypeIntrospector};
use crate::metadata::{Catalogue, RawFragment};
use crate::schema::{SchemaDocument, SchemaType};
use state::SynthesisRun;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Entry point of the engine. Cheap to build; every [`build`](Self::build) is an independent run.
#[derive(Clone, Copy)]
pub struct SchemaBuilder<'a> {
    config: &'a SchemaConfig,
    introspector: &'a dyn TypeIntrospector,
    refinements: &'a dyn MemberRefinements,
}

impl<'a> SchemaBuilder<'a> {
    pub fn new(config: &'a SchemaConfig) -> Self {
        Self {
            config,
            introspector: &NoIntrospection,
            refinements: &NoIntrospection,
        }
    }

    pub fn with_introspector(mut self, introspector: &'a dyn TypeIntrospector) -> Self {
        self.introspector = introspector;
        self
    }

    pub fn with_refinements(mut self, refinements: &'a dyn MemberRefinements) -> Self {
        self.refinements = refinements;
        self
    }

    /// Synthesize the schema for every property of `catalogue` under one of `included`
    /// (or the configured include prefixes).
    pub fn build<S: AsRef<str>>(&self, catalogue: &Catalogue, included: &[S]) -> Synthesis {
        let config = self.config;
        info!(properties = catalogue.len(), "Starting JSON schema generation");

        let prefixes: Vec<&str> = included
            .iter()
            .map(|p| p.as_ref())
            .chain(config.include_prefixes.iter().map(String::as_str))
            .collect();
        let removed: Vec<&str> = catalogue
            .values()
            .filter(|p| p.is_removed())
            .map(|p| p.name.as_str())
            .collect();

        let mut run = SynthesisRun::new(config, catalogue, self.introspector, self.refinements);
        let mut properties = BTreeMap::new();

        for (name, property) in catalogue {
            if !matches_included(name, &prefixes) {
                continue;
            }
            if removed.iter().any(|r| is_path_within(name, r)) {
                debug!(property = %name, "Skipping removed property");
                continue;
            }
            run.insert_property(&mut properties, property);
        }

        let definitions =
            postprocess::finalize(&mut properties, &run.registry, &mut run.diagnostics);

        if config.missing_type_log {
            run.diagnostics.log_missing_types();
        }
        info!(
            properties = properties.len(),
            definitions = definitions.len(),
            "Finished JSON schema generation"
        );

        Synthesis {
            document: SchemaDocument {
                schema: config.schema_spec.clone(),
                id: config.schema_id.clone(),
                title: config.title.clone(),
                description: config.description.clone(),
                kind: SchemaType::Object,
                definitions,
                properties,
                additional_properties: config.allow_additional_properties,
            },
            diagnostics: run.diagnostics,
        }
    }
}

/// Merge `fragments` and synthesize their schema without type introspection.
pub fn synthesize<S: AsRef<str>>(
    fragments: Vec<RawFragment>,
    included: &[S],
    config: &SchemaConfig,
) -> Synthesis {
    let catalogue = crate::metadata::merge(fragments);
    SchemaBuilder::new(config).build(&catalogue, included)
}
